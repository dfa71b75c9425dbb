//! Joke panel state around a single remote fetch

use thiserror::Error;

pub const FALLBACK_JOKE: &str = "Oops! The joke machine is broken. Please try again later.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum JokeError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("joke service answered with status {0}")]
    Status(u16),
    #[error("joke service returned an empty body")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JokeState {
    #[default]
    Idle,
    Loading,
    Ready(String),
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct JokePanel {
    state: JokeState,
}

impl JokePanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &JokeState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == JokeState::Loading
    }

    /// Start a request; false if one is already running
    pub fn begin(&mut self) -> bool {
        if self.is_loading() {
            return false;
        }
        self.state = JokeState::Loading;
        true
    }

    pub fn finish(&mut self, result: Result<String, JokeError>) {
        let result = result.and_then(|text| {
            let text = text.trim();
            if text.is_empty() {
                Err(JokeError::Empty)
            } else {
                Ok(text.to_string())
            }
        });

        self.state = match result {
            Ok(text) => JokeState::Ready(text),
            Err(e) => {
                log::error!("Joke fetch failed: {}", e);
                JokeState::Failed
            }
        };
    }

    /// What the panel shows right now
    pub fn text(&self) -> &str {
        match &self.state {
            JokeState::Idle => "",
            JokeState::Loading => "Loading...",
            JokeState::Ready(text) => text,
            JokeState::Failed => FALLBACK_JOKE,
        }
    }
}

/// GET the joke endpoint and return the body text
#[cfg(target_arch = "wasm32")]
pub async fn fetch_joke(endpoint: &str) -> Result<String, JokeError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, Response};

    let js_err = |e: wasm_bindgen::JsValue| JokeError::Request(format!("{:?}", e));

    let init = RequestInit::new();
    init.set_method("GET");
    let request = Request::new_with_str_and_init(endpoint, &init).map_err(js_err)?;
    request.headers().set("Accept", "text/plain").map_err(js_err)?;

    let window = web_sys::window().ok_or_else(|| JokeError::Request("no window".into()))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(|_| JokeError::Request("not a Response".into()))?;

    if !response.ok() {
        return Err(JokeError::Status(response.status()));
    }

    let text = JsFuture::from(response.text().map_err(js_err)?)
        .await
        .map_err(js_err)?;
    text.as_string().ok_or(JokeError::Empty)
}
