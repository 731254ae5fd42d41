//! Message routing
//!
//! Stateless classification of one inbound frame into a delivery plan:
//! which sessions receive which rendered line. The relay actor executes
//! the plan against the session table; nothing here touches channels.

use std::collections::HashSet;

use crate::protocol::{ClientFrame, ServerFrame};
use crate::roster::Directory;
use crate::types::SessionId;

/// One delivery instruction: a rendered frame for a target session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub target: SessionId,
    pub frame: ServerFrame,
}

/// Compute the delivery plan for one frame from an active session.
///
/// - `Broadcast` goes to every registered session, sender included.
/// - `Send` goes to each listed name that resolves to a live non-sender
///   session, at most once each, plus exactly one copy back to the
///   sender so its own view shows the sent message. Names that do not
///   resolve are skipped.
pub fn plan(
    sender: SessionId,
    sender_name: &str,
    frame: &ClientFrame,
    directory: &Directory,
) -> Vec<Delivery> {
    match frame {
        ClientFrame::Broadcast { body } => directory
            .entries()
            .map(|(target, _)| Delivery {
                target,
                frame: ServerFrame::message(sender_name, body),
            })
            .collect(),
        ClientFrame::Send { recipients, body } => {
            let mut deliveries = Vec::with_capacity(recipients.len() + 1);
            let mut seen: HashSet<SessionId> = HashSet::new();
            for name in recipients {
                let Some(target) = directory.resolve(name) else {
                    // Recipient may have just disconnected: drop silently
                    continue;
                };
                if target != sender && seen.insert(target) {
                    deliveries.push(Delivery {
                        target,
                        frame: ServerFrame::message(sender_name, body),
                    });
                }
            }
            deliveries.push(Delivery {
                target: sender,
                frame: ServerFrame::message(sender_name, body),
            });
            deliveries
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory(names: &[(&str, SessionId)]) -> Directory {
        let mut dir = Directory::new();
        for (name, id) in names {
            dir.insert(*id, name.to_string());
        }
        dir
    }

    fn targets(deliveries: &[Delivery]) -> Vec<SessionId> {
        deliveries.iter().map(|d| d.target).collect()
    }

    #[test]
    fn test_broadcast_reaches_everyone() {
        let (alice, bob, carol) = (SessionId::new(), SessionId::new(), SessionId::new());
        let dir = directory(&[("alice", alice), ("bob", bob), ("carol", carol)]);

        let frame = ClientFrame::Broadcast {
            body: "hello".to_string(),
        };
        let plan = plan(bob, "bob", &frame, &dir);

        assert_eq!(plan.len(), 3);
        for delivery in &plan {
            assert_eq!(delivery.frame, ServerFrame::message("bob", "hello"));
        }
        let t = targets(&plan);
        assert!(t.contains(&alice) && t.contains(&bob) && t.contains(&carol));
    }

    #[test]
    fn test_unicast_reaches_recipient_and_sender_only() {
        let (alice, bob, carol) = (SessionId::new(), SessionId::new(), SessionId::new());
        let dir = directory(&[("alice", alice), ("bob", bob), ("carol", carol)]);

        let frame = ClientFrame::Send {
            recipients: vec!["alice".to_string()],
            body: "hi".to_string(),
        };
        let plan = plan(bob, "bob", &frame, &dir);

        assert_eq!(targets(&plan), vec![alice, bob]);
        assert!(plan
            .iter()
            .all(|d| d.frame == ServerFrame::message("bob", "hi")));
        assert!(!targets(&plan).contains(&carol));
    }

    #[test]
    fn test_unicast_unknown_recipient_dropped() {
        let (alice, bob) = (SessionId::new(), SessionId::new());
        let dir = directory(&[("alice", alice), ("bob", bob)]);

        let frame = ClientFrame::Send {
            recipients: vec!["ghost".to_string()],
            body: "anyone?".to_string(),
        };
        let plan = plan(bob, "bob", &frame, &dir);

        // Only the sender's own copy survives
        assert_eq!(targets(&plan), vec![bob]);
    }

    #[test]
    fn test_multicast_fan_out() {
        let ids: Vec<SessionId> = (0..4).map(|_| SessionId::new()).collect();
        let dir = directory(&[
            ("alice", ids[0]),
            ("bob", ids[1]),
            ("carol", ids[2]),
            ("dave", ids[3]),
        ]);

        let frame = ClientFrame::Send {
            recipients: vec!["alice".to_string(), "carol".to_string()],
            body: "lunch?".to_string(),
        };
        let plan = plan(ids[1], "bob", &frame, &dir);

        assert_eq!(targets(&plan), vec![ids[0], ids[2], ids[1]]);
    }

    #[test]
    fn test_multicast_deduplicates_targets() {
        let (alice, bob) = (SessionId::new(), SessionId::new());
        let dir = directory(&[("alice", alice), ("bob", bob)]);

        // Duplicate entries and the sender's own name collapse to one
        // copy per session
        let frame = ClientFrame::Send {
            recipients: vec![
                "alice".to_string(),
                "alice".to_string(),
                "bob".to_string(),
            ],
            body: "x".to_string(),
        };
        let plan = plan(bob, "bob", &frame, &dir);

        assert_eq!(targets(&plan), vec![alice, bob]);
    }

    #[test]
    fn test_multicast_skips_unknown_names() {
        let (alice, bob, carol) = (SessionId::new(), SessionId::new(), SessionId::new());
        let dir = directory(&[("alice", alice), ("bob", bob), ("carol", carol)]);

        let frame = ClientFrame::Send {
            recipients: vec!["alice".to_string(), "ghost".to_string(), "carol".to_string()],
            body: "ping".to_string(),
        };
        let plan = plan(bob, "bob", &frame, &dir);

        assert_eq!(targets(&plan), vec![alice, carol, bob]);
    }
}
