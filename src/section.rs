//! Content sections and their per-section configuration

/// One of the fixed portfolio sections
///
/// Declaration order is the stable ordinal used for iteration and
/// tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Home,
    About,
    Projects,
    Skills,
    Contact,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Home,
        Section::About,
        Section::Projects,
        Section::Skills,
        Section::Contact,
    ];

    /// Sections a game can unlock (everything but Home)
    pub const LOCKABLE: [Section; 4] = [
        Section::About,
        Section::Projects,
        Section::Skills,
        Section::Contact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Home => "Home",
            Section::About => "About",
            Section::Projects => "Projects",
            Section::Skills => "Skills",
            Section::Contact => "Contact",
        }
    }

    /// Parse a section name (as used in `data-section` attributes)
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "home" => Some(Section::Home),
            "about" => Some(Section::About),
            "projects" => Some(Section::Projects),
            "skills" => Some(Section::Skills),
            "contact" => Some(Section::Contact),
            _ => None,
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Bit used by the unlock set
    #[inline]
    pub(crate) fn bit(&self) -> u8 {
        1 << self.index()
    }

    pub fn style(&self) -> SectionStyle {
        match self {
            Section::Home => SectionStyle {
                hex: "#22d3ee",
                color: rgb(0x22d3ee),
                platform: (0.5, 0.9),
            },
            Section::About => SectionStyle {
                hex: "#f472b6",
                color: rgb(0xf472b6),
                platform: (0.2, 0.65),
            },
            Section::Projects => SectionStyle {
                hex: "#818cf8",
                color: rgb(0x818cf8),
                platform: (0.8, 0.65),
            },
            Section::Skills => SectionStyle {
                hex: "#a3e635",
                color: rgb(0xa3e635),
                platform: (0.35, 0.30),
            },
            Section::Contact => SectionStyle {
                hex: "#fbbf24",
                color: rgb(0xfbbf24),
                platform: (0.65, 0.30),
            },
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display configuration for a section
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionStyle {
    /// CSS colour token
    pub hex: &'static str,
    /// Same colour as RGBA floats for the renderer
    pub color: [f32; 4],
    /// Platform anchor in the compact jumper layout (fractions of width/height)
    pub platform: (f32, f32),
}

/// Opaque RGBA from a 0xRRGGBB literal
pub const fn rgb(hex: u32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}
