use hark_core::Utterance;
use regex::Regex;

/// What an utterance resolved to. Produced by [`CommandRouter::route`],
/// consumed by the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRequest {
    Terminate,
    Help,
    Time,
    Date,
    OpenApp(String),
    OpenWebsite { domain: String, path: String },
    WebSearch(String),
    SaveNote(String),
    SetTimer { seconds: u64, count: u64, unit: String },
    Unrecognized,
}

/// Deterministic first-match router. The rule order is fixed and is part
/// of the contract: termination, help, time, date, open app, open website,
/// search, note, timer, fallback.
pub struct CommandRouter {
    terminate: Regex,
    help: Regex,
    time: Regex,
    date: Regex,
    open_app: Regex,
    open_website: Regex,
    search: Regex,
    note: Regex,
    timer: Regex,
}

impl CommandRouter {
    /// Compile the rule set. `app_keys` feeds the open-app alternation so
    /// rule 5 only ever matches allowlisted keys.
    pub fn new(app_keys: &[String]) -> Self {
        let alternation = if app_keys.is_empty() {
            // No keys: a pattern that cannot match anything
            r"\b\B".to_string()
        } else {
            app_keys
                .iter()
                .map(|k| regex::escape(k))
                .collect::<Vec<_>>()
                .join("|")
        };

        Self {
            terminate: Regex::new(r"\b(?:quit|exit|stop assistant|goodbye)\b").unwrap(),
            help: Regex::new(r"\b(?:help|what can you do)\b").unwrap(),
            time: Regex::new(r"\btime\b").unwrap(),
            date: Regex::new(r"\b(?:date|day)\b").unwrap(),
            open_app: Regex::new(&format!(r"\b(?:open|launch|start)\s+({alternation})\b"))
                .unwrap(),
            open_website: Regex::new(r"\bopen\s+(?:website\s+)?([a-z0-9.-]+\.[a-z]{2,})(/\S*)?\b")
                .unwrap(),
            search: Regex::new(r"\bsearch\s+(.+)$").unwrap(),
            note: Regex::new(r"\b(?:note|take\s+note)\s+(.+)$").unwrap(),
            timer: Regex::new(
                r"\btimer\b.*\bfor\s+(\d+)\s*(seconds|second|minutes|minute|hours|hour)?\b",
            )
            .unwrap(),
        }
    }

    pub fn route(&self, utterance: &Utterance) -> ActionRequest {
        let text = utterance.as_str();

        if self.terminate.is_match(text) {
            return ActionRequest::Terminate;
        }
        if self.help.is_match(text) {
            return ActionRequest::Help;
        }
        if self.time.is_match(text) {
            return ActionRequest::Time;
        }
        if self.date.is_match(text) {
            return ActionRequest::Date;
        }
        if let Some(caps) = self.open_app.captures(text) {
            return ActionRequest::OpenApp(caps[1].to_string());
        }
        if let Some(caps) = self.open_website.captures(text) {
            return ActionRequest::OpenWebsite {
                domain: caps[1].to_string(),
                path: caps.get(2).map_or("", |m| m.as_str()).to_string(),
            };
        }
        if let Some(caps) = self.search.captures(text) {
            let query = caps[1].trim();
            if !query.is_empty() {
                return ActionRequest::WebSearch(query.to_string());
            }
        }
        if let Some(caps) = self.note.captures(text) {
            let note = caps[1].trim();
            if !note.is_empty() {
                return ActionRequest::SaveNote(note.to_string());
            }
        }
        if let Some(caps) = self.timer.captures(text) {
            if let Ok(count) = caps[1].parse::<u64>() {
                let unit = caps.get(2).map_or("seconds", |m| m.as_str()).to_string();
                return ActionRequest::SetTimer {
                    seconds: seconds_from(count, &unit),
                    count,
                    unit,
                };
            }
        }

        ActionRequest::Unrecognized
    }
}

/// Convert a spoken count and unit word to seconds. Seconds when the unit
/// is absent or unknown.
pub fn seconds_from(count: u64, unit: &str) -> u64 {
    let unit = unit.to_lowercase();
    if unit.starts_with("min") {
        count.saturating_mul(60)
    } else if unit.starts_with("hour") {
        count.saturating_mul(3600)
    } else {
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> CommandRouter {
        CommandRouter::new(&[
            "chrome".to_string(),
            "calculator".to_string(),
            "notepad".to_string(),
            "vscode".to_string(),
        ])
    }

    fn route(text: &str) -> ActionRequest {
        router().route(&Utterance::from_raw(text))
    }

    #[test]
    fn test_termination_words_route_to_terminate() {
        for text in ["quit", "exit", "stop assistant", "goodbye"] {
            assert_eq!(route(text), ActionRequest::Terminate, "word: {text}");
        }
    }

    #[test]
    fn test_termination_matches_whole_words_any_case() {
        assert_eq!(route("okay QUIT now"), ActionRequest::Terminate);
        assert_eq!(route("please Exit."), ActionRequest::Terminate);
        // "quit" embedded in another word must not terminate
        assert_ne!(route("that was quite nice"), ActionRequest::Terminate);
    }

    #[test]
    fn test_terminate_outranks_every_other_rule() {
        assert_eq!(route("quit and open chrome"), ActionRequest::Terminate);
        assert_eq!(route("search then goodbye"), ActionRequest::Terminate);
    }

    #[test]
    fn test_help_requests() {
        assert_eq!(route("help"), ActionRequest::Help);
        assert_eq!(route("what can you do"), ActionRequest::Help);
    }

    #[test]
    fn test_time_request() {
        assert_eq!(route("time"), ActionRequest::Time);
        assert_eq!(route("what time is it"), ActionRequest::Time);
    }

    #[test]
    fn test_date_request() {
        assert_eq!(route("date"), ActionRequest::Date);
        assert_eq!(route("what day is it"), ActionRequest::Date);
    }

    #[test]
    fn test_open_allowlisted_apps() {
        assert_eq!(route("open chrome"), ActionRequest::OpenApp("chrome".to_string()));
        assert_eq!(
            route("launch calculator"),
            ActionRequest::OpenApp("calculator".to_string())
        );
        assert_eq!(route("start vscode"), ActionRequest::OpenApp("vscode".to_string()));
    }

    #[test]
    fn test_open_unlisted_app_is_not_rule_five() {
        // "firefox" is not a key and not a domain either
        assert_eq!(route("open firefox"), ActionRequest::Unrecognized);
    }

    #[test]
    fn test_rule_order_app_beats_search() {
        // Matches rule 5 (app) and rule 7 (search); rule 5 is first
        assert_eq!(
            route("open chrome and search cats"),
            ActionRequest::OpenApp("chrome".to_string())
        );
        // Without an open verb, only rule 7 applies
        assert_eq!(
            route("search for chrome themes"),
            ActionRequest::WebSearch("for chrome themes".to_string())
        );
    }

    #[test]
    fn test_rule_order_is_stable_across_calls() {
        let text = Utterance::from_raw("open chrome and search cats");
        let router = router();
        let first = router.route(&text);
        for _ in 0..10 {
            assert_eq!(router.route(&text), first);
        }
    }

    #[test]
    fn test_open_website_bare_domain() {
        assert_eq!(
            route("open youtube.com"),
            ActionRequest::OpenWebsite {
                domain: "youtube.com".to_string(),
                path: String::new(),
            }
        );
    }

    #[test]
    fn test_open_website_with_keyword_and_path() {
        assert_eq!(
            route("open website example.com/docs/intro"),
            ActionRequest::OpenWebsite {
                domain: "example.com".to_string(),
                path: "/docs/intro".to_string(),
            }
        );
    }

    #[test]
    fn test_open_without_domain_is_unrecognized() {
        assert_eq!(route("open example"), ActionRequest::Unrecognized);
    }

    #[test]
    fn test_search_with_query() {
        assert_eq!(
            route("search rust borrow checker"),
            ActionRequest::WebSearch("rust borrow checker".to_string())
        );
    }

    #[test]
    fn test_note_variants() {
        assert_eq!(
            route("note buy milk"),
            ActionRequest::SaveNote("buy milk".to_string())
        );
        assert_eq!(
            route("take note call the dentist tomorrow"),
            ActionRequest::SaveNote("call the dentist tomorrow".to_string())
        );
    }

    #[test]
    fn test_bare_note_is_unrecognized() {
        assert_eq!(route("note"), ActionRequest::Unrecognized);
    }

    #[test]
    fn test_timer_two_minutes_converts_to_120_seconds() {
        assert_eq!(
            route("timer for 2 minutes"),
            ActionRequest::SetTimer {
                seconds: 120,
                count: 2,
                unit: "minutes".to_string(),
            }
        );
    }

    #[test]
    fn test_timer_phrasing_and_units() {
        assert_eq!(
            route("set a timer for 10 seconds"),
            ActionRequest::SetTimer {
                seconds: 10,
                count: 10,
                unit: "seconds".to_string(),
            }
        );
        assert_eq!(
            route("timer for 1 hour"),
            ActionRequest::SetTimer {
                seconds: 3600,
                count: 1,
                unit: "hour".to_string(),
            }
        );
    }

    #[test]
    fn test_timer_unit_defaults_to_seconds() {
        assert_eq!(
            route("timer for 5"),
            ActionRequest::SetTimer {
                seconds: 5,
                count: 5,
                unit: "seconds".to_string(),
            }
        );
    }

    #[test]
    fn test_unmatched_text_is_unrecognized() {
        assert_eq!(route("make me a sandwich"), ActionRequest::Unrecognized);
        assert_eq!(route(""), ActionRequest::Unrecognized);
    }

    #[test]
    fn test_router_with_no_app_keys_never_matches_rule_five() {
        let router = CommandRouter::new(&[]);
        let request = router.route(&Utterance::from_raw("open chrome"));
        assert_ne!(request, ActionRequest::OpenApp("chrome".to_string()));
    }

    #[test]
    fn test_seconds_from_units() {
        assert_eq!(seconds_from(10, "seconds"), 10);
        assert_eq!(seconds_from(1, "second"), 1);
        assert_eq!(seconds_from(2, "minutes"), 120);
        assert_eq!(seconds_from(1, "minute"), 60);
        assert_eq!(seconds_from(2, "hours"), 7200);
        assert_eq!(seconds_from(1, "hour"), 3600);
        assert_eq!(seconds_from(7, ""), 7);
    }
}
