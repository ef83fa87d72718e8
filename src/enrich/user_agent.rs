//! User-agent parsing capability
//!
//! Wraps the woothee classifier behind a trait so the device, browser and
//! OS rules can be tested with deterministic fakes.

use woothee::parser::Parser;

/// What the classification rules need to know about a user agent.
#[derive(Debug, Clone, Default)]
pub struct UaProfile {
    pub is_mobile: bool,
    pub is_tablet: bool,
    pub is_desktop: bool,
    /// Browser name, `None` when the parser has no confident answer
    pub browser: Option<String>,
    /// Operating system name, `None` when unknown
    pub os: Option<String>,
}

/// Classifies a raw user-agent string.
pub trait UserAgentInspector: Send + Sync {
    fn inspect(&self, user_agent: &str) -> UaProfile;
}

/// [`UserAgentInspector`] backed by woothee.
///
/// woothee has no tablet category of its own (iPads classify as
/// smartphones), so tablets are recognized from well-known markers before
/// the parsed category is consulted.
pub struct WootheeInspector {
    parser: Parser,
}

const TABLET_MARKERS: [&str; 4] = ["iPad", "Tablet", "Kindle", "Silk"];

impl WootheeInspector {
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
        }
    }
}

impl Default for WootheeInspector {
    fn default() -> Self {
        Self::new()
    }
}

impl UserAgentInspector for WootheeInspector {
    fn inspect(&self, user_agent: &str) -> UaProfile {
        let is_tablet = TABLET_MARKERS.iter().any(|m| user_agent.contains(m))
            || (user_agent.contains("Android") && !user_agent.contains("Mobile"));

        let Some(parsed) = self.parser.parse(user_agent) else {
            return UaProfile {
                is_tablet,
                ..Default::default()
            };
        };

        let browser = match parsed.name {
            "" | "UNKNOWN" => None,
            name => Some(name.to_string()),
        };
        let os = match parsed.os {
            "" | "UNKNOWN" => None,
            os => Some(os.to_string()),
        };

        UaProfile {
            is_mobile: matches!(parsed.category, "smartphone" | "mobilephone"),
            is_tablet,
            is_desktop: parsed.category == "pc",
            browser,
            os,
        }
    }
}
