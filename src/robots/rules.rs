// src/robots/rules.rs
// =============================================================================
// Parsed robots.txt rules.
//
// Allow/Disallow matching is delegated to `robotstxt::DefaultMatcher`, which
// follows Google's implementation (longest match wins, Allow beats Disallow
// on ties, specific user-agent groups beat "*").
//
// The matcher doesn't expose Crawl-delay, so we scan for it ourselves,
// preferring a group naming our user agent over the "*" group.
//
// Group names are compared by product token only, case-insensitively:
// "page-harvester/0.1.0" and "Page-Harvester" both name "page-harvester".
// =============================================================================

use robotstxt::DefaultMatcher;
use std::time::Duration;
use tracing::debug;

use super::CrawlPolicy;

#[derive(Debug, Clone, Default)]
pub struct RobotsRules {
    content: String,
}

impl RobotsRules {
    /// Wraps the raw robots.txt body
    pub fn parse(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// Rules that allow everything (used when robots.txt is missing)
    pub fn allow_all() -> Self {
        Self::default()
    }
}

// The leading run of letters, '-' and '_': the part of a user agent that
// robots.txt groups name
fn product_token(user_agent: &str) -> &str {
    let end = user_agent
        .find(|c: char| !(c.is_ascii_alphabetic() || c == '-' || c == '_'))
        .unwrap_or(user_agent.len());
    &user_agent[..end]
}

impl CrawlPolicy for RobotsRules {
    fn is_allowed(&self, user_agent: &str, url: &str) -> bool {
        if self.content.is_empty() {
            return true;
        }

        let user_agent = product_token(user_agent.trim());
        let mut matcher = DefaultMatcher::default();
        let allowed = matcher.one_agent_allowed_by_robots(&self.content, user_agent, url);

        if !allowed {
            debug!("robots.txt disallows {} for {}", url, user_agent);
        }

        allowed
    }

    fn crawl_delay(&self, user_agent: &str) -> Option<Duration> {
        let user_agent = product_token(user_agent.trim()).to_ascii_lowercase();

        // Consecutive User-agent lines share one group of rules
        let mut group_agents: Vec<String> = Vec::new();
        let mut in_rules = false;

        let mut default_delay = None;
        let mut specific_delay = None;

        for line in self.content.lines() {
            // Strip comments
            let line = match line.find('#') {
                Some(index) => &line[..index],
                None => line,
            };

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "user-agent" => {
                    if in_rules {
                        group_agents.clear();
                        in_rules = false;
                    }
                    group_agents.push(value.to_ascii_lowercase());
                }
                "crawl-delay" => {
                    in_rules = true;

                    let Some(delay) = value
                        .parse::<f64>()
                        .ok()
                        .filter(|delay| delay.is_finite() && *delay >= 0.0)
                        .map(Duration::from_secs_f64)
                    else {
                        continue;
                    };

                    for agent in &group_agents {
                        if agent == "*" {
                            default_delay.get_or_insert(delay);
                            continue;
                        }

                        let name = product_token(agent);
                        if !name.is_empty() && name == user_agent {
                            specific_delay.get_or_insert(delay);
                        }
                    }
                }
                _ => in_rules = true,
            }
        }

        specific_delay.or(default_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AGENT: &str = "page-harvester";

    #[test]
    fn test_allow_all() {
        let rules = RobotsRules::allow_all();
        assert!(rules.is_allowed(AGENT, "https://example.com/any/path"));
        assert_eq!(rules.crawl_delay(AGENT), None);
    }

    #[test]
    fn test_disallow_rules() {
        let content = r#"
User-agent: *
Disallow: /admin/
Disallow: /private

User-agent: BadBot
Disallow: /
"#;
        let rules = RobotsRules::parse(content);

        assert!(rules.is_allowed(AGENT, "https://example.com/public/page"));
        assert!(!rules.is_allowed(AGENT, "https://example.com/admin/secret"));
        assert!(!rules.is_allowed(AGENT, "https://example.com/private"));
        assert!(!rules.is_allowed("BadBot", "https://example.com/anything"));
    }

    #[test]
    fn test_crawl_delay() {
        let content = r#"
User-agent: *
Crawl-delay: 2

User-agent: page-harvester
User-agent: other-bot
Crawl-delay: 0.5
"#;
        let rules = RobotsRules::parse(content);

        assert_eq!(rules.crawl_delay(AGENT), Some(Duration::from_millis(500)));
        assert_eq!(rules.crawl_delay("RandomBot"), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_versioned_agent_uses_its_own_group() {
        let content = "User-agent: *\nDisallow: /private\n\n\
                       User-agent: Page-Harvester\nDisallow: /secret\nCrawl-delay: 7\n";
        let rules = RobotsRules::parse(content);
        let agent = "page-harvester/0.1.0";

        assert!(!rules.is_allowed(agent, "https://example.com/secret"));
        assert!(rules.is_allowed(agent, "https://example.com/private"));
        assert_eq!(rules.crawl_delay(agent), Some(Duration::from_secs(7)));
    }

    #[test]
    fn test_crawl_delay_needs_exact_group_name() {
        let content = "User-agent: p\nCrawl-delay: 9\n\n\
                       User-agent:\nCrawl-delay: 8\n\n\
                       User-agent: page-harvester-extra\nCrawl-delay: 6\n\n\
                       User-agent: *\nCrawl-delay: 1\n";
        let rules = RobotsRules::parse(content);

        assert_eq!(rules.crawl_delay(AGENT), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_product_token() {
        assert_eq!(product_token("page-harvester/0.1.0"), "page-harvester");
        assert_eq!(product_token("Googlebot"), "Googlebot");
        assert_eq!(product_token("*"), "");
        assert_eq!(product_token(""), "");
    }

    #[test]
    fn test_crawl_delay_ignores_garbage() {
        let content = "User-agent: *\ncrawl-delay: soon # maybe\nDisallow: /tmp\n";
        let rules = RobotsRules::parse(content);
        assert_eq!(rules.crawl_delay(AGENT), None);
    }
}
