//! Bot-likelihood heuristics
//!
//! The user-agent is scored first; when it carries no signal the client IP
//! is checked against known crawler and datacenter ranges. There are no
//! request headers available at this point, so header-based prefetch
//! detection is out.

use ipnet::IpNet;
use std::net::IpAddr;

/// Outcome of one heuristic check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotSignal {
    /// The heuristic has no opinion
    NoSignal,
    /// Looks like a real browser
    Human,
    /// The user-agent identifies an automated client
    BotUserAgent,
    /// No user-agent header was sent at all
    NoUserAgent,
    /// The client IP falls inside a known crawler/datacenter range
    BotIpRange,
}

impl BotSignal {
    pub fn is_bot(self) -> bool {
        matches!(
            self,
            BotSignal::BotUserAgent | BotSignal::NoUserAgent | BotSignal::BotIpRange
        )
    }
}

/// Scores requests for bot likelihood.
pub trait BotHeuristics: Send + Sync {
    fn score_user_agent(&self, user_agent: &str) -> BotSignal;
    fn score_ip(&self, ip: IpAddr) -> BotSignal;
}

/// Combine both heuristics: the user-agent wins whenever it has a signal,
/// the IP-range check is the fallback.
pub fn score(heuristics: &dyn BotHeuristics, user_agent: &str, ip: IpAddr) -> BotSignal {
    match heuristics.score_user_agent(user_agent) {
        BotSignal::NoSignal => heuristics.score_ip(ip),
        signal => signal,
    }
}

/// Substrings that identify automated clients. Matched case-insensitively.
const BOT_MARKERS: &[&str] = &[
    "bot",
    "crawler",
    "spider",
    "crawling",
    "scraper",
    "slurp",
    "feedfetcher",
    "facebookexternalhit",
    "mediapartners-google",
    "headlesschrome",
    "phantomjs",
    "curl/",
    "wget/",
    "python-requests",
    "python-urllib",
    "go-http-client",
    "okhttp",
    "libwww-perl",
    "httpclient",
    "pingdom",
    "uptimerobot",
];

/// Prefixes real browsers have carried since forever.
const BROWSER_MARKERS: &[&str] = &["Mozilla/", "Opera/"];

/// Published crawler ranges checked when the user-agent is inconclusive.
const BOT_RANGES: &[&str] = &[
    // Googlebot
    "66.249.64.0/19",
    // Bingbot
    "157.55.39.0/24",
    "207.46.13.0/24",
    "40.77.167.0/24",
    // Yandex
    "100.43.64.0/19",
    // Applebot
    "17.241.0.0/16",
];

/// Keyword and CIDR based [`BotHeuristics`].
pub struct HeuristicBotDetector {
    ranges: Vec<IpNet>,
}

impl HeuristicBotDetector {
    pub fn new() -> Self {
        Self {
            ranges: BOT_RANGES.iter().filter_map(|c| c.parse().ok()).collect(),
        }
    }
}

impl Default for HeuristicBotDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl BotHeuristics for HeuristicBotDetector {
    fn score_user_agent(&self, user_agent: &str) -> BotSignal {
        let ua = user_agent.trim();
        if ua.is_empty() || ua == "-" {
            return BotSignal::NoUserAgent;
        }

        let lowered = ua.to_ascii_lowercase();
        if BOT_MARKERS.iter().any(|m| lowered.contains(m)) {
            return BotSignal::BotUserAgent;
        }

        if BROWSER_MARKERS.iter().any(|m| ua.starts_with(m)) {
            return BotSignal::Human;
        }

        BotSignal::NoSignal
    }

    fn score_ip(&self, ip: IpAddr) -> BotSignal {
        if self.ranges.iter().any(|net| net.contains(&ip)) {
            BotSignal::BotIpRange
        } else {
            BotSignal::NoSignal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_googlebot_user_agent() {
        let detector = HeuristicBotDetector::new();
        let signal = detector.score_user_agent(
            "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)",
        );
        assert_eq!(signal, BotSignal::BotUserAgent);
        assert!(signal.is_bot());
    }

    #[test]
    fn test_missing_user_agent_is_bot() {
        let detector = HeuristicBotDetector::new();
        assert!(detector.score_user_agent("-").is_bot());
        assert!(detector.score_user_agent("").is_bot());
    }

    #[test]
    fn test_browser_user_agent_is_human() {
        let detector = HeuristicBotDetector::new();
        let signal = detector.score_user_agent(
            "Mozilla/5.0 (X11; Linux x86_64; rv:120.0) Gecko/20100101 Firefox/120.0",
        );
        assert_eq!(signal, BotSignal::Human);
        assert!(!signal.is_bot());
    }

    #[test]
    fn test_ip_range_fallback() {
        let detector = HeuristicBotDetector::new();
        let crawler: IpAddr = "66.249.66.1".parse().unwrap();
        let residential: IpAddr = "203.0.113.7".parse().unwrap();

        assert_eq!(detector.score_ip(crawler), BotSignal::BotIpRange);
        assert_eq!(detector.score_ip(residential), BotSignal::NoSignal);
    }

    #[test]
    fn test_user_agent_signal_wins_over_ip() {
        let detector = HeuristicBotDetector::new();
        // browser UA from a crawler range: the UA signal is taken
        let signal = score(
            &detector,
            "Mozilla/5.0 (X11; Linux x86_64; rv:120.0) Gecko/20100101 Firefox/120.0",
            "66.249.66.1".parse().unwrap(),
        );
        assert_eq!(signal, BotSignal::Human);
    }

    #[test]
    fn test_no_signal_falls_back_to_ip() {
        let detector = HeuristicBotDetector::new();
        let signal = score(&detector, "SomeOpaqueAgent/1.0", "66.249.66.1".parse().unwrap());
        assert_eq!(signal, BotSignal::BotIpRange);
    }
}
