//! JSON history files and the report computed from them.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use splitledger_core::{GroupId, UserId};
use splitledger_events::LedgerEvent;
use splitledger_ledger::{Aggregator, GroupStatement, LedgerConfig, NetBalance};

/// A group's exported event history.
#[derive(Debug, Clone, Deserialize)]
pub struct History {
    pub group_id: GroupId,
    /// When present, every event identity must belong to this set.
    #[serde(default)]
    pub members: Option<Vec<UserId>>,
    pub events: Vec<LedgerEvent>,
}

impl History {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read history file {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("failed to parse history file {}", path.display()))
    }

    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// What the binary prints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Report {
    Statement(GroupStatement),
    User(NetBalance),
}

pub fn build_report(
    history: History,
    config: &LedgerConfig,
    user: Option<UserId>,
) -> anyhow::Result<Report> {
    let mut aggregator = Aggregator::new(history.group_id).with_config(*config);
    if let Some(members) = history.members {
        aggregator = aggregator.with_members(members);
    }

    let (expenses, settlements) = LedgerEvent::partition(history.events);
    tracing::info!(
        group_id = %history.group_id,
        expenses = expenses.len(),
        settlements = settlements.len(),
        "loaded ledger history"
    );

    let statement = GroupStatement::compute_with(&aggregator, &expenses, &settlements)
        .with_context(|| format!("failed to compute ledger for group {}", history.group_id))?;

    Ok(match user {
        Some(user_id) => Report::User(statement.net_balance_for(user_id)),
        None => Report::Statement(statement),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitledger_core::{LedgerError, Money};
    use uuid::Uuid;

    fn user(n: u128) -> UserId {
        UserId::from_uuid(Uuid::from_u128(n))
    }

    fn history_json(members: Option<&[u128]>) -> String {
        let group = Uuid::from_u128(100);
        let members = members
            .map(|m| {
                let ids: Vec<String> = m.iter().map(|n| format!("\"{}\"", Uuid::from_u128(*n))).collect();
                format!("\"members\": [{}],", ids.join(","))
            })
            .unwrap_or_default();
        format!(
            r#"{{
                "group_id": "{group}",
                {members}
                "events": [
                    {{
                        "type": "expense_recorded",
                        "data": {{
                            "event_id": "{e1}",
                            "group_id": "{group}",
                            "payer": "{a}",
                            "total": 90,
                            "shares": [
                                {{ "user_id": "{a}", "amount": 30 }},
                                {{ "user_id": "{b}", "amount": 30 }},
                                {{ "user_id": "{c}", "amount": 30 }}
                            ],
                            "occurred_at": "2024-01-01T12:00:00Z"
                        }}
                    }},
                    {{
                        "type": "settlement_recorded",
                        "data": {{
                            "event_id": "{e2}",
                            "group_id": "{group}",
                            "payer": "{b}",
                            "receiver": "{a}",
                            "amount": 30,
                            "occurred_at": "2024-01-02T12:00:00Z"
                        }}
                    }}
                ]
            }}"#,
            e1 = Uuid::from_u128(1),
            e2 = Uuid::from_u128(2),
            a = Uuid::from_u128(1),
            b = Uuid::from_u128(2),
            c = Uuid::from_u128(3),
        )
    }

    #[test]
    fn builds_group_statement_from_history() {
        let history = History::parse(&history_json(None)).unwrap();
        let report = build_report(history, &LedgerConfig::default(), None).unwrap();

        let Report::Statement(statement) = report else {
            panic!("expected a group statement");
        };
        assert_eq!(statement.plan.len(), 1);
        assert_eq!(statement.plan[0].from, user(3));
        assert_eq!(statement.plan[0].to, user(1));
        assert_eq!(statement.plan[0].amount, Money::from_minor(30));
    }

    #[test]
    fn reports_single_user_position() {
        let history = History::parse(&history_json(None)).unwrap();
        let report = build_report(history, &LedgerConfig::default(), Some(user(1))).unwrap();

        let Report::User(balance) = report else {
            panic!("expected a single user balance");
        };
        assert_eq!(balance.net, Money::from_minor(30));
    }

    #[test]
    fn enforces_members_when_listed() {
        let history = History::parse(&history_json(Some(&[1, 2]))).unwrap();
        let err = build_report(history, &LedgerConfig::default(), None).unwrap_err();

        let cause = err.downcast_ref::<LedgerError>().unwrap();
        assert_eq!(
            *cause,
            LedgerError::UnknownParticipant {
                event_id: splitledger_core::EventId::from_uuid(Uuid::from_u128(1)),
                user_id: user(3),
            }
        );
    }

    #[test]
    fn rejects_malformed_history() {
        assert!(History::parse("{ \"events\": [] }").is_err());
    }
}
