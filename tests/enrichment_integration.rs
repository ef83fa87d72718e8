//! Integration tests for the enrichment pipeline
//!
//! These run the real capabilities end-to-end: woothee for user agents,
//! the keyword/CIDR bot heuristics, and a GeoIP service without a
//! database (country then degrades to Unknown, which is exactly the
//! behavior a fresh deployment without an MMDB shows).

use std::sync::Arc;

use warren::enrich::{
    AccessEvent, GeoIpService, HeuristicBotDetector, MetricPoint, MetricSink, Tagger,
    WootheeInspector, UNKNOWN,
};

const CHROME_DESKTOP: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const GOOGLEBOT: &str =
    "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";

fn tagger() -> Tagger {
    Tagger::new(
        Arc::new(GeoIpService::new(None).unwrap()),
        Arc::new(WootheeInspector::new()),
        Arc::new(HeuristicBotDetector::new()),
    )
}

fn event(user_agent: &str, path: &str) -> AccessEvent {
    AccessEvent {
        timestamp: 1_700_000_000_000,
        remote_ip: "203.0.113.9".parse().unwrap(),
        user_agent: user_agent.to_string(),
        status_code: "200".to_string(),
        host: "example.com".to_string(),
        path: path.to_string(),
        bytes_sent: 1024,
    }
}

#[test]
fn test_browser_event_gets_full_tag_set() {
    let tags = tagger().tags(&event(CHROME_DESKTOP, "/blog/post.html"));

    assert_eq!(tags.len(), 9);
    assert_eq!(tags["device"], "Desktop");
    assert_eq!(tags["browser"], "Chrome");
    assert_eq!(tags["os"], "Windows 10");
    assert_eq!(tags["country"], UNKNOWN); // no MMDB configured
    assert_eq!(tags["statuscode"], "200");
    assert_eq!(tags["statuscategory"], "2xx");
    assert_eq!(tags["path"], "/blog/post.html");
    assert_eq!(tags["filetype"], "Page");
    assert_eq!(tags["isprobablybot"], "false");
}

#[test]
fn test_crawler_event_is_tagged_as_bot() {
    let tags = tagger().tags(&event(GOOGLEBOT, "/"));
    assert_eq!(tags["isprobablybot"], "true");
}

#[test]
fn test_missing_user_agent_degrades_and_still_tags_everything() {
    let tags = tagger().tags(&event("-", "/assets/app.js"));

    assert_eq!(tags.len(), 9);
    assert_eq!(tags["device"], UNKNOWN);
    assert_eq!(tags["browser"], UNKNOWN);
    assert_eq!(tags["os"], UNKNOWN);
    assert_eq!(tags["filetype"], "Javascript");
    // no user agent at all scores as a bot
    assert_eq!(tags["isprobablybot"], "true");
}

#[test]
fn test_no_referrer_tag_exists() {
    let tags = tagger().tags(&event(CHROME_DESKTOP, "/"));
    assert!(!tags.contains_key("referrer"));
    assert!(!tags.contains_key(""));
}

#[tokio::test]
async fn test_point_flows_into_a_sink() {
    use std::sync::Mutex;

    struct RecordingSink {
        points: Mutex<Vec<MetricPoint>>,
    }

    #[async_trait::async_trait]
    impl MetricSink for RecordingSink {
        async fn write(&self, point: MetricPoint) -> anyhow::Result<()> {
            self.points.lock().unwrap().push(point);
            Ok(())
        }
    }

    let sink = RecordingSink {
        points: Mutex::new(Vec::new()),
    };

    let point = tagger().point(&event(CHROME_DESKTOP, "/index.html"));
    sink.write(point).await.unwrap();

    let points = sink.points.lock().unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].name, "example.com");
    assert_eq!(points[0].fields.hits, 1);
    assert_eq!(points[0].timestamp.timestamp(), 1_700_000_000);
    assert_eq!(points[0].tags.len(), 9);
}
