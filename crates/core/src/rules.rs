//! Declarative field-location rules.
//!
//! Each field of a referral is found by one rule: a fixed line, a token on a fixed line,
//! or an anchor search starting at some offset. The [`RuleTable`] groups the rules for the
//! known document template; rules that depend on the authorization status are looked up
//! through [`RuleTable::date_rules`].

use crate::constants::*;
use crate::error::{IntakeError, IntakeResult};
use crate::status::AuthorizationState;

/// How a single field value is located in the line sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineRule {
    /// The trimmed content of the line at `index`.
    Fixed { index: usize },
    /// The trimmed `token`-th piece of the line at `index` split on single spaces.
    Token { index: usize, token: usize },
    /// Scanning forward from `from`, the line after the first line containing `anchor`.
    ///
    /// Yields nothing when no anchor line is followed by another line.
    AnchorThenNext { from: usize, anchor: &'static str },
    /// Scanning from `from` to the end, the last line containing `anchor`; the value is the
    /// piece between the first and the second `delimiter`.
    ///
    /// A missing anchor is an error.
    AnchorSplit {
        from: usize,
        anchor: &'static str,
        delimiter: char,
    },
}

impl LineRule {
    /// Apply the rule to `lines`.
    ///
    /// `field` names the field in any error produced.
    pub fn locate<S: AsRef<str>>(
        &self,
        lines: &[S],
        field: &'static str,
    ) -> IntakeResult<Option<String>> {
        match *self {
            LineRule::Fixed { index } => Ok(Some(line_at(lines, index, field)?.trim().to_string())),
            LineRule::Token { index, token } => {
                let line = line_at(lines, index, field)?;
                line.split(' ')
                    .nth(token)
                    .map(|t| Some(t.trim().to_string()))
                    .ok_or(IntakeError::MissingToken {
                        field,
                        index,
                        token,
                    })
            }
            LineRule::AnchorThenNext { from, anchor } => {
                let found = lines
                    .iter()
                    .enumerate()
                    .skip(from)
                    .find(|(i, line)| *i + 1 < lines.len() && line.as_ref().contains(anchor))
                    .map(|(i, _)| lines[i + 1].as_ref().trim().to_string());
                Ok(found)
            }
            LineRule::AnchorSplit {
                from,
                anchor,
                delimiter,
            } => {
                let (index, line) = lines
                    .iter()
                    .enumerate()
                    .skip(from)
                    .filter(|(_, line)| line.as_ref().contains(anchor))
                    .last()
                    .ok_or(IntakeError::MissingAnchor {
                        field,
                        anchor,
                        from,
                    })?;

                let value = line
                    .as_ref()
                    .split(delimiter)
                    .nth(1)
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .ok_or(IntakeError::MalformedLine {
                        field,
                        line: index,
                        delimiter,
                    })?;

                Ok(Some(value.to_string()))
            }
        }
    }
}

fn line_at<'a, S: AsRef<str>>(
    lines: &'a [S],
    index: usize,
    field: &'static str,
) -> IntakeResult<&'a str> {
    lines
        .get(index)
        .map(AsRef::as_ref)
        .ok_or(IntakeError::MissingLine { field, index })
}

/// Rules for the fields whose position depends on the document layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateRules {
    pub received_date: LineRule,
    pub date_of_birth: LineRule,
}

/// Field rules for one document template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleTable {
    pub reference_number: LineRule,
    pub patient: LineRule,
    pub status: LineRule,
    pub urgency: LineRule,
    pub authorized: DateRules,
    pub denied: DateRules,
}

impl RuleTable {
    /// Date rules for `status`, or `None` for layouts with no known date positions.
    pub fn date_rules(&self, status: AuthorizationState) -> Option<&DateRules> {
        match status {
            AuthorizationState::Authorized => Some(&self.authorized),
            AuthorizationState::Denied => Some(&self.denied),
            AuthorizationState::Referral | AuthorizationState::Canceled => None,
        }
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            reference_number: LineRule::Token {
                index: REFERENCE_LINE,
                token: REFERENCE_TOKEN,
            },
            patient: LineRule::Fixed {
                index: PATIENT_LINE,
            },
            status: LineRule::Fixed { index: STATUS_LINE },
            urgency: LineRule::Fixed {
                index: URGENCY_LINE,
            },
            authorized: DateRules {
                received_date: LineRule::Fixed {
                    index: AUTHORIZED_RECEIVED_LINE,
                },
                date_of_birth: LineRule::AnchorThenNext {
                    from: DEMOGRAPHICS_SCAN_START,
                    anchor: AUTHORIZED_BIRTH_ANCHOR,
                },
            },
            denied: DateRules {
                received_date: LineRule::Fixed {
                    index: DENIED_RECEIVED_LINE,
                },
                date_of_birth: LineRule::AnchorSplit {
                    from: DEMOGRAPHICS_SCAN_START,
                    anchor: DENIED_BIRTH_ANCHOR,
                    delimiter: ':',
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELD: &str = "test_field";

    #[test]
    fn fixed_rule_trims_line() {
        let lines = ["a\n", "  03/01/2024 \n"];
        let rule = LineRule::Fixed { index: 1 };
        assert_eq!(
            rule.locate(&lines, FIELD).unwrap().as_deref(),
            Some("03/01/2024")
        );
    }

    #[test]
    fn fixed_rule_reports_missing_line() {
        let lines = ["only line\n"];
        let err = LineRule::Fixed { index: 8 }
            .locate(&lines, FIELD)
            .expect_err("line 8 is missing");
        match err {
            IntakeError::MissingLine { field, index } => {
                assert_eq!(field, FIELD);
                assert_eq!(index, 8);
            }
            other => panic!("expected MissingLine, got {other:?}"),
        }
    }

    #[test]
    fn line_at_returns_untrimmed_line() {
        let lines = vec!["first\n".to_string(), "  second \n".to_string()];
        assert_eq!(line_at(&lines, 1, FIELD).unwrap(), "  second \n");
        assert!(matches!(
            line_at(&lines, 2, FIELD),
            Err(IntakeError::MissingLine { index: 2, .. })
        ));
    }

    #[test]
    fn token_rule_splits_on_single_spaces() {
        let lines = ["REF 123 ABC456\n"];
        let rule = LineRule::Token { index: 0, token: 2 };
        assert_eq!(rule.locate(&lines, FIELD).unwrap().as_deref(), Some("ABC456"));

        // A double space yields an empty token, as a plain split would.
        let lines = ["REF  ABC456\n"];
        assert_eq!(rule.locate(&lines, FIELD).unwrap().as_deref(), Some("ABC456"));
        let lines = ["REF  123 ABC456\n"];
        assert_eq!(rule.locate(&lines, FIELD).unwrap().as_deref(), Some("123"));
    }

    #[test]
    fn token_rule_reports_missing_token() {
        let lines = ["REF123\n"];
        let err = LineRule::Token { index: 0, token: 2 }
            .locate(&lines, FIELD)
            .expect_err("no third token");
        assert!(matches!(
            err,
            IntakeError::MissingToken {
                index: 0,
                token: 2,
                ..
            }
        ));
    }

    #[test]
    fn anchor_then_next_takes_first_match() {
        let lines = [
            "Birth: \n",
            "ignored, before offset\n",
            "Date of Birth: \n",
            "01/15/1960\n",
            "Date of Birth: \n",
            "02/02/1972\n",
        ];
        let rule = LineRule::AnchorThenNext {
            from: 1,
            anchor: "Birth: ",
        };
        assert_eq!(
            rule.locate(&lines, FIELD).unwrap().as_deref(),
            Some("01/15/1960")
        );
    }

    #[test]
    fn anchor_then_next_needs_a_following_line() {
        let lines = ["x\n", "Date of Birth: "];
        let rule = LineRule::AnchorThenNext {
            from: 0,
            anchor: "Birth: ",
        };
        assert_eq!(rule.locate(&lines, FIELD).unwrap(), None);

        let empty: [&str; 0] = [];
        assert_eq!(rule.locate(&empty, FIELD).unwrap(), None);
    }

    #[test]
    fn anchor_split_takes_last_match() {
        let lines = [
            "Birth: 09/09/1909\n",
            "Subscriber Birth: 01/15/1960\n",
            "filler\n",
            "Member Date of Birth: 07/04/1944\n",
            "filler\n",
        ];
        let rule = LineRule::AnchorSplit {
            from: 1,
            anchor: "Birth:",
            delimiter: ':',
        };
        assert_eq!(
            rule.locate(&lines, FIELD).unwrap().as_deref(),
            Some("07/04/1944")
        );
    }

    #[test]
    fn anchor_split_keeps_only_segment_after_first_delimiter() {
        let lines = ["Birth: 07/04/1944 Age: 80\n"];
        let rule = LineRule::AnchorSplit {
            from: 0,
            anchor: "Birth:",
            delimiter: ':',
        };
        assert_eq!(
            rule.locate(&lines, FIELD).unwrap().as_deref(),
            Some("07/04/1944 Age")
        );
    }

    #[test]
    fn anchor_split_reports_missing_anchor_and_empty_value() {
        let rule = LineRule::AnchorSplit {
            from: 1,
            anchor: "Birth:",
            delimiter: ':',
        };

        let lines = ["Birth: 01/01/2000\n", "nothing here\n"];
        let err = rule.locate(&lines, FIELD).expect_err("anchor only before offset");
        assert!(matches!(err, IntakeError::MissingAnchor { from: 1, .. }));

        let lines = ["x\n", "Date of Birth:\n"];
        let err = rule.locate(&lines, FIELD).expect_err("nothing after colon");
        assert!(matches!(err, IntakeError::MalformedLine { line: 1, .. }));
    }

    #[test]
    fn date_rules_exist_only_for_authorized_and_denied() {
        let table = RuleTable::default();
        assert!(table.date_rules(AuthorizationState::Authorized).is_some());
        assert!(table.date_rules(AuthorizationState::Denied).is_some());
        assert!(table.date_rules(AuthorizationState::Referral).is_none());
        assert!(table.date_rules(AuthorizationState::Canceled).is_none());
    }
}
