//! Terminal styling for submission output
//!
//! Every styled value carries a [`Tone`], which decides both its color and
//! the stream used for color-support detection. Detection itself is left to
//! `owo-colors` (honours `NO_COLOR`, `CLICOLOR`, `CLICOLOR_FORCE` and TTY
//! checks).
//!
//! | Tone       | Look   | Stream | Used for                          |
//! |------------|--------|--------|-----------------------------------|
//! | `Accent`   | Cyan   | stdout | post ids, file names, URLs        |
//! | `Success`  | Green  | stdout | accepted image, shared post       |
//! | `Warn`     | Yellow | stderr | moderation rejections             |
//! | `Error`    | Red    | stderr | failed remote calls               |
//! | `Muted`    | Dim    | stdout | MIME types, hints                 |
//! | `Emphasis` | Bold   | stdout | current phase                     |

use indicatif::ProgressStyle;
pub use owo_colors::Stream;
use owo_colors::{OwoColorize, Style};
use std::fmt::{self, Display};
use std::sync::OnceLock;

/// Semantic tone of a styled value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Primary information
    Accent,
    /// Completed work
    Success,
    /// Needs attention
    Warn,
    /// Failure
    Error,
    /// Secondary information
    Muted,
    /// Headline for the current action
    Emphasis,
}

impl Tone {
    const fn style(self) -> Style {
        match self {
            Self::Accent => Style::new().cyan(),
            Self::Success => Style::new().green(),
            Self::Warn => Style::new().yellow(),
            Self::Error => Style::new().red(),
            Self::Muted => Style::new().dimmed(),
            Self::Emphasis => Style::new().bold(),
        }
    }

    const fn stream(self) -> Stream {
        match self {
            Self::Warn | Self::Error => Stream::Stderr,
            _ => Stream::Stdout,
        }
    }
}

/// A value rendered with a [`Tone`]
#[derive(Clone, Debug)]
pub struct Styled<T> {
    value: T,
    tone: Tone,
}

impl<T: Display> Display for Styled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let style = self.tone.style();
        write!(
            f,
            "{}",
            self.value
                .if_supports_color(self.tone.stream(), |v| v.style(style))
        )
    }
}

/// Extension trait adding tones to anything displayable
pub trait Stylize: Display {
    /// Render with an explicit tone
    fn tone(&self, tone: Tone) -> Styled<&Self> {
        Styled { value: self, tone }
    }

    /// Cyan, for ids, names and URLs
    fn accent(&self) -> Styled<&Self> {
        self.tone(Tone::Accent)
    }

    /// Green, for completed work
    fn success(&self) -> Styled<&Self> {
        self.tone(Tone::Success)
    }

    /// Yellow on stderr, for rejections
    fn warn(&self) -> Styled<&Self> {
        self.tone(Tone::Warn)
    }

    /// Red on stderr, for failures
    fn error(&self) -> Styled<&Self> {
        self.tone(Tone::Error)
    }

    /// Dim, for secondary details
    fn muted(&self) -> Styled<&Self> {
        self.tone(Tone::Muted)
    }

    /// Bold, for the current phase
    fn emphasis(&self) -> Styled<&Self> {
        self.tone(Tone::Emphasis)
    }
}

impl<T: Display + ?Sized> Stylize for T {}

/// Arrow pointing at a follow-up location
pub const ARROW: &str = "→";

/// Green checkmark
pub const fn check() -> Styled<&'static str> {
    Styled {
        value: "✓",
        tone: Tone::Success,
    }
}

/// Red cross
pub const fn cross() -> Styled<&'static str> {
    Styled {
        value: "✗",
        tone: Tone::Error,
    }
}

/// OSC 8 hyperlink whose text is the URL itself
///
/// Plain text when the stream does not support hyperlinks.
pub fn hyperlink_url(stream: Stream, url: &str) -> String {
    let target = match stream {
        Stream::Stdout => supports_hyperlinks::Stream::Stdout,
        Stream::Stderr => supports_hyperlinks::Stream::Stderr,
    };
    if supports_hyperlinks::on(target) {
        terminal_link::Link::new(url, url).to_string()
    } else {
        url.to_string()
    }
}

/// Upload bar: cyan fill with a percentage
pub fn upload_bar_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::default_bar()
                .template("  {bar:30.cyan/blue} {pos:>3}% {msg}")
                .expect("hardcoded progress template is valid")
                .progress_chars("=> ")
        })
        .clone()
}
