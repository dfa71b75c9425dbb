//! Portfolio Quest entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::JsCast;
    use web_sys::{Document, Element, Event, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use portfolio_quest::consts::*;
    use portfolio_quest::joke::{JokePanel, fetch_joke};
    use portfolio_quest::platform::{EventListener, FrameLoop};
    use portfolio_quest::renderer::{RenderState, scene};
    use portfolio_quest::renderer::vertex::colors;
    use portfolio_quest::sim::{Direction, ShotOutcome};
    use portfolio_quest::{GameKind, Section, Session, Settings};

    /// Page instance holding all state
    struct App {
        session: Session,
        settings: Settings,
        joke: JokePanel,
        game_canvas: HtmlCanvasElement,
        background_canvas: HtmlCanvasElement,
        game_renderer: Option<RenderState>,
        background_renderer: Option<RenderState>,
        last_time: f64,
        /// Unlock revision last mirrored into the DOM
        synced_revision: Option<u64>,
        /// Notice text last mirrored into the DOM
        shown_notice: Option<&'static str>,
    }

    /// Subscriptions that live as long as the page
    struct Handles {
        _listeners: Vec<EventListener>,
        _frames: FrameLoop,
    }

    thread_local! {
        static HANDLES: RefCell<Option<Handles>> = const { RefCell::new(None) };
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    /// CSS-pixel size of an element, None while it has no layout
    fn css_size(canvas: &HtmlCanvasElement) -> Option<Vec2> {
        let size = Vec2::new(canvas.client_width() as f32, canvas.client_height() as f32);
        (size.x > 0.0 && size.y > 0.0).then_some(size)
    }

    fn elements(document: &Document, selector: &str) -> Vec<Element> {
        let Ok(list) = document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    impl App {
        fn new(
            seed: u64,
            settings: Settings,
            game_canvas: HtmlCanvasElement,
            background_canvas: HtmlCanvasElement,
        ) -> Self {
            Self {
                session: Session::new(seed, &settings),
                settings,
                joke: JokePanel::new(),
                game_canvas,
                background_canvas,
                game_renderer: None,
                background_renderer: None,
                last_time: 0.0,
                synced_revision: None,
                shown_notice: None,
            }
        }

        /// Re-read element sizes and layout mode
        fn measure(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio() as f32;

            let viewport = window
                .inner_width()
                .ok()
                .and_then(|w| w.as_f64())
                .unwrap_or_default() as f32;
            self.session.set_compact_layout(self.settings.is_compact(viewport));

            let arena = css_size(&self.game_canvas);
            self.session.resize_arena(arena);
            if let Some(size) = arena {
                let (w, h) = ((size.x * dpr) as u32, (size.y * dpr) as u32);
                self.game_canvas.set_width(w);
                self.game_canvas.set_height(h);
                if let Some(r) = &mut self.game_renderer {
                    r.resize(w, h, dpr);
                }
            }

            if let Some(size) = css_size(&self.background_canvas) {
                self.session.resize_background(size);
                let (w, h) = ((size.x * dpr) as u32, (size.y * dpr) as u32);
                self.background_canvas.set_width(w);
                self.background_canvas.set_height(h);
                if let Some(r) = &mut self.background_renderer {
                    r.resize(w, h, dpr);
                }
            }
        }

        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;

            self.session.frame(dt);

            for outcome in self.session.drain_outcomes() {
                match outcome {
                    ShotOutcome::TargetHit {
                        section,
                        destroyed: true,
                        ..
                    } => log::info!("{} target shattered", section),
                    other => log::debug!("Shot resolved: {:?}", other),
                }
            }
            // Sparks already hold everything the renderer needs
            self.session.effects.drain_emitted();
        }

        fn render(&mut self) {
            let game = scene::game(&self.session);
            let background = scene::background(&self.session.background);

            for (renderer, vertices) in [
                (&mut self.game_renderer, game),
                (&mut self.background_renderer, background),
            ] {
                let Some(renderer) = renderer else {
                    continue;
                };
                match renderer.render(&vertices) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost) => renderer.reconfigure(),
                    Err(wgpu::SurfaceError::OutOfMemory) => log::error!("Out of memory!"),
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Reset confirmation popup
        fn sync_notice(&mut self) {
            let notice = self.session.notice();
            if notice == self.shown_notice {
                return;
            }
            self.shown_notice = notice;
            let Some(el) = document().and_then(|d| d.get_element_by_id("notification")) else {
                return;
            };
            el.set_text_content(notice);
            let class = if notice.is_some() { "notification" } else { "notification hidden" };
            let _ = el.set_attribute("class", class);
        }

        /// Mirror unlock state into navigation and content panels
        fn sync_dom(&mut self) {
            self.sync_notice();
            let unlocks = &mut self.session.unlocks;
            for event in unlocks.drain_events() {
                log::debug!("Unlock event: {:?}", event);
            }
            if self.synced_revision == Some(unlocks.revision()) {
                return;
            }
            self.synced_revision = Some(unlocks.revision());

            let Some(document) = document() else {
                return;
            };
            let active = unlocks.active();

            for panel in elements(&document, "[data-section-panel]") {
                let section = panel
                    .get_attribute("data-section-panel")
                    .as_deref()
                    .and_then(Section::from_name);
                let class = if section == Some(active) {
                    "section-panel"
                } else {
                    "section-panel hidden"
                };
                let _ = panel.set_attribute("class", class);
            }

            for button in elements(&document, "[data-section]") {
                let Some(section) = button
                    .get_attribute("data-section")
                    .as_deref()
                    .and_then(Section::from_name)
                else {
                    continue;
                };
                if unlocks.is_unlocked(section) {
                    let _ = button.remove_attribute("disabled");
                } else {
                    let _ = button.set_attribute("disabled", "");
                }
                let class = if section == active { "nav-btn active" } else { "nav-btn" };
                let _ = button.set_attribute("class", class);
            }

            if let Some(el) = document.get_element_by_id("unlock-count") {
                el.set_text_content(Some(&format!(
                    "{}/{}",
                    unlocks.unlocked_count(),
                    Section::ALL.len()
                )));
            }
        }

        /// Game selector and layout classes
        fn sync_game_ui(&self) {
            let Some(document) = document() else {
                return;
            };
            for button in elements(&document, "[data-game]") {
                let selected = button.get_attribute("data-game").as_deref()
                    == Some(self.session.game().as_str());
                let _ = button.set_attribute("class", if selected { "game-btn active" } else { "game-btn" });
            }
            if let Some(body) = document.body() {
                let _ = body.set_attribute("class", if self.session.is_compact() { "compact" } else { "" });
            }
            if let Some(el) = document.get_element_by_id("game-hint") {
                el.set_text_content(Some(self.session.hint()));
            }
        }

        fn show_joke(&self) {
            if let Some(el) = document().and_then(|d| d.get_element_by_id("joke-text")) {
                el.set_text_content(Some(self.joke.text()));
            }
        }
    }

    async fn init_renderer(
        instance: &wgpu::Instance,
        canvas: &HtmlCanvasElement,
        dpr: f32,
        clear: [f32; 4],
    ) -> Option<RenderState> {
        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return None;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return None;
            }
        };
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (w, h) = (canvas.width(), canvas.height());
        match RenderState::new(surface, &adapter, w, h, dpr, clear).await {
            Ok(state) => Some(state),
            Err(e) => {
                log::error!("Renderer unavailable: {}", e);
                None
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Portfolio Quest starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let game_canvas: HtmlCanvasElement = document
            .get_element_by_id("game-canvas")
            .expect("no game canvas")
            .dyn_into()
            .expect("not a canvas");
        let background_canvas: HtmlCanvasElement = document
            .get_element_by_id("background-canvas")
            .expect("no background canvas")
            .dyn_into()
            .expect("not a canvas");

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(
            seed,
            settings,
            game_canvas.clone(),
            background_canvas.clone(),
        )));
        app.borrow_mut().measure();
        log::info!("Session initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        let dpr = window.device_pixel_ratio() as f32;
        let game_renderer = init_renderer(&instance, &game_canvas, dpr, colors::BACKGROUND).await;
        let background_renderer =
            init_renderer(&instance, &background_canvas, dpr, colors::BACKGROUND).await;
        {
            let mut a = app.borrow_mut();
            a.game_renderer = game_renderer;
            a.background_renderer = background_renderer;
        }

        let listeners = setup_listeners(&app, &window, &document);

        {
            let a = app.borrow();
            a.sync_game_ui();
            a.show_joke();
        }

        let frames = {
            let app = app.clone();
            FrameLoop::start(move |time| {
                let mut a = app.borrow_mut();
                a.update(time);
                a.render();
                a.sync_dom();
            })
        };
        HANDLES.with(|h| {
            *h.borrow_mut() = Some(Handles {
                _listeners: listeners,
                _frames: frames,
            });
        });

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }
        log::info!("Portfolio Quest running!");
    }

    fn setup_listeners(
        app: &Rc<RefCell<App>>,
        window: &web_sys::Window,
        document: &Document,
    ) -> Vec<EventListener> {
        let (game_canvas, background_canvas) = {
            let a = app.borrow();
            (a.game_canvas.clone(), a.background_canvas.clone())
        };
        let mut listeners = Vec::new();

        // Arrow keys drive the maze
        {
            let app = app.clone();
            listeners.push(EventListener::new(window, "keydown", move |event: &Event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let Some(dir) = Direction::from_key(&event.key()) else {
                    return;
                };
                if app.borrow_mut().session.key_down(dir).is_some() {
                    event.prevent_default();
                }
            }));
        }

        // Game surface: aim, fire, platform taps
        {
            let app = app.clone();
            listeners.push(EventListener::new(&game_canvas, "mousemove", move |event: &Event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let pos = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                app.borrow_mut().session.pointer_move(pos);
            }));
        }
        {
            let app = app.clone();
            listeners.push(EventListener::new(&game_canvas, "mouseleave", move |_event: &Event| {
                app.borrow_mut().session.pointer_leave();
            }));
        }
        {
            let app = app.clone();
            listeners.push(EventListener::new(&game_canvas, "click", move |event: &Event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let pos = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                let mut a = app.borrow_mut();
                if a.session.is_compact() {
                    let tapped = a.session.arena().and_then(|arena| scene::platform_at(pos, arena));
                    if let Some(section) = tapped {
                        a.session.tap_platform(section);
                    }
                } else {
                    a.session.click(pos);
                }
            }));
        }

        // Content panel feeds the backdrop pointer
        if let Some(content) = document.get_element_by_id("content") {
            {
                let app = app.clone();
                let background_canvas = background_canvas.clone();
                listeners.push(EventListener::new(&content, "mousemove", move |event: &Event| {
                    let Some(event) = event.dyn_ref::<MouseEvent>() else {
                        return;
                    };
                    let rect = background_canvas.get_bounding_client_rect();
                    let pos = Vec2::new(
                        event.client_x() as f32 - rect.left() as f32,
                        event.client_y() as f32 - rect.top() as f32,
                    );
                    app.borrow_mut().session.background_pointer(Some(pos));
                }));
            }
            {
                let app = app.clone();
                listeners.push(EventListener::new(&content, "mouseleave", move |_event: &Event| {
                    app.borrow_mut().session.background_pointer(None);
                }));
            }
        }

        // Navigation buttons
        for button in elements(document, "[data-section]") {
            let Some(section) = button
                .get_attribute("data-section")
                .as_deref()
                .and_then(Section::from_name)
            else {
                log::warn!("Nav button with unknown section");
                continue;
            };
            let app = app.clone();
            listeners.push(EventListener::new(&button, "click", move |_event: &Event| {
                if !app.borrow_mut().session.navigate(section) {
                    log::debug!("{} is still locked", section);
                }
            }));
        }

        // Game selector
        for button in elements(document, "[data-game]") {
            let Some(game) = button
                .get_attribute("data-game")
                .as_deref()
                .and_then(GameKind::from_name)
            else {
                continue;
            };
            let app = app.clone();
            listeners.push(EventListener::new(&button, "click", move |_event: &Event| {
                let mut a = app.borrow_mut();
                a.session.select_game(game);
                a.sync_game_ui();
            }));
        }

        if let Some(button) = document.get_element_by_id("reset-btn") {
            let app = app.clone();
            listeners.push(EventListener::new(&button, "click", move |_event: &Event| {
                let mut a = app.borrow_mut();
                a.session.reset();
                a.sync_notice();
            }));
        }

        if let Some(button) = document.get_element_by_id("joke-btn") {
            let app = app.clone();
            listeners.push(EventListener::new(&button, "click", move |_event: &Event| {
                let endpoint = {
                    let mut a = app.borrow_mut();
                    if !a.joke.begin() {
                        return;
                    }
                    a.show_joke();
                    a.settings.joke_endpoint.clone()
                };
                let app = app.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let result = fetch_joke(&endpoint).await;
                    let mut a = app.borrow_mut();
                    a.joke.finish(result);
                    a.show_joke();
                });
            }));
        }

        {
            let app = app.clone();
            listeners.push(EventListener::new(window, "resize", move |_event: &Event| {
                let mut a = app.borrow_mut();
                a.measure();
                a.sync_game_ui();
            }));
        }

        log::info!("Attached {} listeners", listeners.len());
        listeners
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Portfolio Quest (native) starting...");
    log::info!("The page itself needs a browser - run with `trunk serve` for the web version");

    println!("\nRunning scripted session...");
    scripted_session();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Walk the maze to the Skills key, then shoot at the About target
#[cfg(not(target_arch = "wasm32"))]
fn scripted_session() {
    use glam::Vec2;
    use portfolio_quest::consts::SIM_DT;
    use portfolio_quest::sim::Direction;
    use portfolio_quest::{GameKind, Section, Session, Settings};

    let mut session = Session::new(7, &Settings::load());
    session.resize_arena(Some(Vec2::new(800.0, 600.0)));
    session.resize_background(Vec2::new(1280.0, 800.0));

    session.select_game(GameKind::Maze);
    let route = [Direction::Down; 5]
        .into_iter()
        .chain([Direction::Right; 2])
        .chain([Direction::Up; 3]);
    for dir in route {
        if let Some(outcome) = session.key_down(dir) {
            log::debug!("{:?} -> {:?}", dir, outcome);
        }
    }
    println!("Maze: Skills unlocked = {}", session.unlocks.is_unlocked(Section::Skills));

    session.select_game(GameKind::Shooter);
    for _ in 0..10 {
        let Some(center) = session
            .shooter()
            .and_then(|s| s.target(Section::About))
            .map(|t| t.center())
        else {
            break;
        };
        session.click(center);
        for _ in 0..40 {
            session.frame(SIM_DT);
        }
        for outcome in session.drain_outcomes() {
            println!("Shot: {:?}", outcome);
        }
    }

    for event in session.unlocks.drain_events() {
        log::debug!("Unlock event: {:?}", event);
    }
    let unlocked: Vec<_> = session.unlocks.unlocked().map(|s| s.as_str()).collect();
    println!("Unlocked: {}", unlocked.join(", "));
    println!("Active: {}", session.unlocks.active());
}
