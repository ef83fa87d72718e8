//! Classification rules and the enrichment pipeline
//!
//! Every access event is classified into a fixed vocabulary of nine tags:
//! `device`, `browser`, `os`, `country`, `statuscode`, `statuscategory`,
//! `path`, `filetype` and `isprobablybot`. A rule that cannot produce a
//! confident value resolves to the literal [`UNKNOWN`]; classification
//! degrades, it never fails an event.

use std::sync::Arc;
use tracing::warn;

use crate::enrich::bot::{self, BotHeuristics};
use crate::enrich::geoip::GeoLookup;
use crate::enrich::models::{AccessEvent, MetricPoint, PointFields, TagSet};
use crate::enrich::user_agent::UserAgentInspector;

/// Shared sentinel for any tag the rules cannot determine.
pub const UNKNOWN: &str = "Unknown";

/// All rules share one signature; a rule may decline to produce a tag.
type Rule = fn(&Tagger, &AccessEvent) -> Option<(&'static str, String)>;

/// Fixed dispatch order. Tag names are distinct by construction, so later
/// rules never overwrite earlier ones.
const RULES: &[Rule] = &[
    Tagger::device,
    Tagger::browser,
    Tagger::os,
    Tagger::country,
    Tagger::status_code,
    Tagger::status_category,
    Tagger::path,
    Tagger::referrer,
    Tagger::file_type,
    Tagger::is_probably_bot,
];

/// Turns one access event into a tag set and a metric point.
///
/// The geo, user-agent and bot capabilities are injected so the pipeline
/// can run against deterministic fakes in tests.
pub struct Tagger {
    geo: Arc<dyn GeoLookup>,
    user_agents: Arc<dyn UserAgentInspector>,
    bots: Arc<dyn BotHeuristics>,
}

impl Tagger {
    pub fn new(
        geo: Arc<dyn GeoLookup>,
        user_agents: Arc<dyn UserAgentInspector>,
        bots: Arc<dyn BotHeuristics>,
    ) -> Self {
        Self {
            geo,
            user_agents,
            bots,
        }
    }

    /// Run every classification rule over the event and merge the results.
    pub fn tags(&self, event: &AccessEvent) -> TagSet {
        let mut tags = TagSet::new();
        for rule in RULES {
            if let Some((name, value)) = rule(self, event) {
                tags.insert(name.to_string(), value);
            }
        }
        tags
    }

    /// Wrap [`Tagger::tags`] into a metric point carrying a constant hit
    /// count of one and the event's timestamp.
    pub fn point(&self, event: &AccessEvent) -> MetricPoint {
        MetricPoint {
            name: event.host.clone(),
            tags: self.tags(event),
            fields: PointFields { hits: 1 },
            timestamp: event.time(),
        }
    }

    // Mutually exclusive, checked mobile first so a user agent carrying
    // both mobile and tablet signals classifies as Mobile.
    fn device(&self, event: &AccessEvent) -> Option<(&'static str, String)> {
        let ua = self.user_agents.inspect(&event.user_agent);
        let device = if ua.is_mobile {
            "Mobile"
        } else if ua.is_tablet {
            "Tablet"
        } else if ua.is_desktop {
            "Desktop"
        } else {
            UNKNOWN
        };
        Some(("device", device.to_string()))
    }

    fn browser(&self, event: &AccessEvent) -> Option<(&'static str, String)> {
        let ua = self.user_agents.inspect(&event.user_agent);
        match ua.browser {
            Some(name) if name != "-" => Some(("browser", name)),
            _ => Some(("browser", UNKNOWN.to_string())),
        }
    }

    fn os(&self, event: &AccessEvent) -> Option<(&'static str, String)> {
        let ua = self.user_agents.inspect(&event.user_agent);
        match ua.os {
            Some(os) if !os.is_empty() => Some(("os", os)),
            _ => Some(("os", UNKNOWN.to_string())),
        }
    }

    // Lookup failure is logged and degrades; it never aborts enrichment.
    fn country(&self, event: &AccessEvent) -> Option<(&'static str, String)> {
        let value = match self.geo.country(event.remote_ip) {
            Ok(Some(name)) if !name.is_empty() => name,
            Ok(_) => {
                warn!(ip = %event.remote_ip, "Country came back blank");
                UNKNOWN.to_string()
            }
            Err(err) => {
                warn!(ip = %event.remote_ip, error = %err, "Unable to get country");
                UNKNOWN.to_string()
            }
        };
        Some(("country", value))
    }

    fn status_code(&self, event: &AccessEvent) -> Option<(&'static str, String)> {
        Some(("statuscode", event.status_code.clone()))
    }

    fn status_category(&self, event: &AccessEvent) -> Option<(&'static str, String)> {
        let mut chars = event.status_code.chars();
        match (chars.next(), event.status_code.chars().count()) {
            (Some(first), 3) => Some(("statuscategory", format!("{first}xx"))),
            _ => {
                warn!(code = %event.status_code, "Can't get status category from weird code");
                Some(("statuscategory", UNKNOWN.to_string()))
            }
        }
    }

    fn path(&self, event: &AccessEvent) -> Option<(&'static str, String)> {
        Some(("path", event.path.clone()))
    }

    // Referrer classification never shipped; the rule stays in the
    // dispatch order but contributes no tag.
    fn referrer(&self, _event: &AccessEvent) -> Option<(&'static str, String)> {
        None
    }

    fn file_type(&self, event: &AccessEvent) -> Option<(&'static str, String)> {
        Some(("filetype", classify_file_type(&event.path).to_string()))
    }

    fn is_probably_bot(&self, event: &AccessEvent) -> Option<(&'static str, String)> {
        let signal = bot::score(self.bots.as_ref(), &event.user_agent, event.remote_ip);
        Some(("isprobablybot", signal.is_bot().to_string()))
    }
}

/// Classify by the extension of the path's final segment. No segment or
/// no extension means a page load; extensions match case-sensitively.
fn classify_file_type(path: &str) -> &'static str {
    let filename = match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    };

    if filename.is_empty() {
        return "Page";
    }

    let Some(dot) = filename.rfind('.') else {
        return "Page";
    };

    match &filename[dot + 1..] {
        "html" => "Page",
        "css" => "Stylesheet",
        "js" => "Javascript",
        "img" | "jpg" | "jpeg" | "png" | "ico" | "gif" | "svg" | "heic" => "Image",
        "ttf" | "otf" | "woff" | "woff2" => "Font",
        "txt" | "csv" | "pdf" | "doc" | "docx" | "xls" | "xlsx" | "ppt" | "pptx" => "Document",
        "zip" | "gz" | "rar" | "iso" | "tar" | "lzma" | "bz2" | "7z" | "z" | "tgz" => "Archive",
        "mp3" | "m4a" | "wav" | "ogg" | "flac" | "midi" | "aac" | "wma" => "Audio",
        "mpg" | "mpeg" | "avi" | "mp4" | "flv" | "h264" | "mov" | "mk4" | "mkv" | "m4v" => "Video",
        "xml" => "RSS Feed",
        _ => UNKNOWN,
    }
}
