// ── Notification demultiplexer ──
//
// Classifies each line pushed on the event channel, decodes the FST
// peer and session notifications, and hands them to the registered
// handler. Only the daemon's termination notice stops the dispatcher;
// parse errors never do.

use tracing::{debug, error, trace, warn};

use crate::model::{
    FstEvent, Initiator, PeerStateChange, Reason, SessionEvent, SessionEventType,
    SessionState, SessionStateChange, TransitionToInitial,
};
use crate::parse::{self, ParseError};
use crate::proto;

/// Receiver of decoded notifications.
///
/// Implemented for every `FnMut(FstEvent) + Send` closure.
pub trait NotificationHandler: Send {
    fn on_event(&mut self, event: FstEvent);
}

impl<F> NotificationHandler for F
where
    F: FnMut(FstEvent) + Send,
{
    fn on_event(&mut self, event: FstEvent) {
        self(event);
    }
}

/// What the dispatcher does after a line has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Terminate,
}

/// Handle one event-channel line.
///
/// Without a handler, FST notifications are dropped undecoded.
pub fn demux(line: &str, handler: Option<&mut dyn NotificationHandler>) -> Flow {
    let body = strip_level(line).trim_end();

    if body.starts_with(proto::EVENT_TERMINATING) {
        error!("daemon is terminating");
        return Flow::Terminate;
    }

    let Some(handler) = handler else {
        trace!(line = body, "no notification handler; dropped");
        return Flow::Continue;
    };

    if let Some(event) = decode(body) {
        handler.on_event(event);
    }
    Flow::Continue
}

/// Decode an FST notification. Returns `None` for lines of any other
/// kind and for session lines without a usable event type.
pub fn decode(line: &str) -> Option<FstEvent> {
    let body = strip_level(line).trim_end();

    if let Some(rest) = strip_any_prefix(body, &proto::PEER_EVENT_PREFIXES) {
        return Some(decode_peer(rest));
    }
    if let Some(rest) = strip_any_prefix(body, &proto::SESSION_EVENT_PREFIXES) {
        return decode_session(rest);
    }

    trace!(line = body, "ignoring non-FST notification");
    None
}

/// Drop a leading `<N>` severity tag.
fn strip_level(line: &str) -> &str {
    line.strip_prefix('<')
        .and_then(|rest| rest.split_once('>'))
        .filter(|(level, _)| level.bytes().all(|b| b.is_ascii_digit()))
        .map_or(line, |(_, body)| body)
}

fn strip_any_prefix<'a>(line: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    prefixes.iter().find_map(|p| line.strip_prefix(p))
}

fn key_is(key: &str, name: &str) -> bool {
    key.eq_ignore_ascii_case(name)
}

fn key_in(key: &str, names: &[&str]) -> bool {
    names.iter().any(|n| key.eq_ignore_ascii_case(n))
}

// ── Peer notifications ──────────────────────────────────────────────

fn decode_peer(body: &str) -> FstEvent {
    let mut change = PeerStateChange::default();
    if let Err(e) = parse::fold_tokens(body, &mut change, apply_peer_token) {
        warn!(error = %e, "truncated peer notification");
    }
    debug!(?change, "peer notification");
    FstEvent::PeerStateChanged(change)
}

fn apply_peer_token(change: &mut PeerStateChange, token: &str) -> Result<(), ParseError> {
    if key_is(token, proto::PEER_CONNECTED) {
        change.connected = true;
        return Ok(());
    }
    if key_is(token, proto::PEER_DISCONNECTED) {
        change.connected = false;
        return Ok(());
    }

    let (key, value) = parse::split_key_value(token)?;
    if key_is(key, proto::KEY_IFNAME) {
        change.ifname = Some(value.to_owned());
    } else if key_in(key, &proto::KEY_PEER_ADDR) {
        change.addr = Some(parse::parse_mac(value)?);
    } else {
        return Err(ParseError::Unknown {
            what: "peer notification key",
            value: key.to_owned(),
        });
    }
    Ok(())
}

// ── Session notifications ───────────────────────────────────────────

#[derive(Debug, Default)]
struct SessionFields {
    event_type: Option<SessionEventType>,
    session_id: Option<u32>,
    old_state: Option<SessionState>,
    new_state: Option<SessionState>,
    reason: Option<Reason>,
    reject_code: Option<u32>,
    initiator: Option<Initiator>,
}

fn decode_session(body: &str) -> Option<FstEvent> {
    let mut fields = SessionFields::default();
    if let Err(e) = parse::fold_tokens(body, &mut fields, apply_session_token) {
        warn!(error = %e, "truncated session notification");
    }

    let Some(event_type) = fields.event_type else {
        warn!(
            session_id = ?fields.session_id,
            line = body,
            "session notification without a known event type; dropped"
        );
        return None;
    };
    let session_id = fields.session_id.unwrap_or(0);

    let event = match event_type {
        SessionEventType::Established => SessionEvent::Established,
        SessionEventType::Setup => SessionEvent::Setup,
        SessionEventType::StateChanged => {
            let touched = fields.reason.is_some()
                || fields.reject_code.is_some()
                || fields.initiator.is_some();
            let to_initial = (fields.new_state == Some(SessionState::Initial) || touched).then(|| {
                TransitionToInitial {
                    reason: fields.reason,
                    reject_code: fields.reject_code.unwrap_or(0),
                    initiator: fields.initiator,
                }
            });
            SessionEvent::StateChanged(SessionStateChange {
                old_state: fields.old_state,
                new_state: fields.new_state,
                to_initial,
            })
        }
    };

    debug!(session_id, ?event, "session notification");
    Some(FstEvent::Session { session_id, event })
}

fn apply_session_token(fields: &mut SessionFields, token: &str) -> Result<(), ParseError> {
    let (key, value) = parse::split_key_value(token)?;
    if value == proto::VALUE_NONE {
        return Ok(());
    }

    if key_in(key, &proto::KEY_EVENT_TYPE) {
        let event_type = value.parse().map_err(|_| ParseError::Unknown {
            what: "session event type",
            value: value.to_owned(),
        })?;
        fields.event_type = Some(event_type);
    } else if key_is(key, proto::KEY_SESSION_ID) {
        fields.session_id = Some(parse::parse_u32(value)?);
    } else if key_is(key, proto::KEY_OLD_STATE) {
        fields.old_state = Some(parse::parse_state(value)?);
    } else if key_is(key, proto::KEY_NEW_STATE) {
        fields.new_state = Some(parse::parse_state(value)?);
    } else if key_is(key, proto::KEY_REASON) {
        let reason = value.parse().map_err(|_| ParseError::Unknown {
            what: "reason",
            value: value.to_owned(),
        })?;
        fields.reason = Some(reason);
    } else if key_is(key, proto::KEY_REJECT_CODE) {
        fields.reject_code = Some(parse::parse_u32(value)?);
    } else if key_is(key, proto::KEY_INITIATOR) {
        fields.initiator = Some(Initiator::from_wire(value));
    } else {
        return Err(ParseError::Unknown {
            what: "session notification key",
            value: key.to_owned(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::INVALID_SESSION_ID;

    fn collect(lines: &[&str]) -> (Vec<FstEvent>, Vec<Flow>) {
        let mut events = Vec::new();
        let mut flows = Vec::new();
        let mut handler = |event: FstEvent| events.push(event);
        for line in lines {
            flows.push(demux(line, Some(&mut handler)));
        }
        (events, flows)
    }

    #[test]
    fn session_state_change_with_aliases() {
        let event = decode(
            "<3>SESSION-EVENT SESSION_ID=7 EVT_TYPE=STATE_CHANGED OLD_STATE=INITIAL NEW_STATE=SETUP_COMPLETION",
        )
        .unwrap();

        assert_eq!(
            event,
            FstEvent::Session {
                session_id: 7,
                event: SessionEvent::StateChanged(SessionStateChange {
                    old_state: Some(SessionState::Initial),
                    new_state: Some(SessionState::SetupCompletion),
                    to_initial: None,
                }),
            }
        );
    }

    #[test]
    fn session_state_change_back_to_initial() {
        let event = decode(
            "<3>FST-EVENT-SESSION event_type=EVENT_FST_SESSION_STATE session_id=2 \
             old_state=TRANSITION_DONE new_state=INITIAL reason=REASON_REJECT \
             reject_code=37 initiator=LOCAL",
        )
        .unwrap();

        let FstEvent::Session {
            session_id,
            event: SessionEvent::StateChanged(change),
        } = event
        else {
            panic!("unexpected {event:?}");
        };
        assert_eq!(session_id, 2);
        assert_eq!(
            change.to_initial,
            Some(TransitionToInitial {
                reason: Some(Reason::Reject),
                reject_code: 37,
                initiator: Some(Initiator::Local),
            })
        );
    }

    #[test]
    fn session_established_and_setup() {
        assert_eq!(
            decode("FST-EVENT-SESSION event_type=EVENT_FST_ESTABLISHED session_id=4").unwrap(),
            FstEvent::Session {
                session_id: 4,
                event: SessionEvent::Established,
            }
        );
        assert_eq!(
            decode("FST-EVENT-SESSION session_id=5 event_type=EVENT_FST_SETUP").unwrap(),
            FstEvent::Session {
                session_id: 5,
                event: SessionEvent::Setup,
            }
        );
    }

    #[test]
    fn session_without_event_type_is_dropped() {
        assert_eq!(decode("FST-EVENT-SESSION session_id=5 old_state=INITIAL"), None);
        assert_eq!(decode("FST-EVENT-SESSION session_id=5 event_type=EVENT_BOGUS"), None);
    }

    #[test]
    fn session_none_value_is_ignored() {
        let event = decode(
            "FST-EVENT-SESSION event_type=EVENT_FST_SESSION_STATE session_id=1 old_state=NONE new_state=TRANSITION_DONE",
        )
        .unwrap();
        let FstEvent::Session {
            event: SessionEvent::StateChanged(change),
            ..
        } = event
        else {
            panic!("unexpected {event:?}");
        };
        assert_eq!(change.old_state, None);
        assert_eq!(change.new_state, Some(SessionState::TransitionDone));
    }

    #[test]
    fn peer_connected_with_aliases() {
        let event = decode("PEER-EVENT connected IFNAME=wlan0 ADDR=aa:bb:cc:dd:ee:ff").unwrap();
        assert_eq!(
            event,
            FstEvent::PeerStateChanged(PeerStateChange {
                connected: true,
                ifname: Some("wlan0".into()),
                addr: Some("aa:bb:cc:dd:ee:ff".parse().unwrap()),
            })
        );
        assert_eq!(event.session_id(), INVALID_SESSION_ID);
    }

    #[test]
    fn peer_bad_tokens_are_skipped() {
        let event =
            decode("<3>FST-EVENT-PEER disconnected ifname=wlan1 peer_addr=zz:zz colour=red")
                .unwrap();
        assert_eq!(
            event,
            FstEvent::PeerStateChanged(PeerStateChange {
                connected: false,
                ifname: Some("wlan1".into()),
                addr: None,
            })
        );
    }

    #[test]
    fn terminating_stops_dispatch() {
        let (events, flows) = collect(&["<2>CTRL-EVENT-TERMINATING", "CTRL-EVENT-TERMINATING\n"]);
        assert!(events.is_empty());
        assert_eq!(flows, vec![Flow::Terminate, Flow::Terminate]);
    }

    #[test]
    fn terminating_stops_dispatch_without_handler() {
        assert_eq!(demux("<2>CTRL-EVENT-TERMINATING", None), Flow::Terminate);
    }

    #[test]
    fn unrelated_lines_continue() {
        let (events, flows) = collect(&[
            "<3>CTRL-EVENT-SCAN-RESULTS",
            "FST-EVENT-SESSION garbage",
            "",
        ]);
        assert!(events.is_empty());
        assert_eq!(flows, vec![Flow::Continue; 3]);
    }

    #[test]
    fn no_handler_drops_events() {
        assert_eq!(
            demux("PEER-EVENT connected IFNAME=wlan0", None),
            Flow::Continue
        );
    }

    #[test]
    fn level_tag_is_optional() {
        assert_eq!(strip_level("<3>abc"), "abc");
        assert_eq!(strip_level("abc"), "abc");
        assert_eq!(strip_level("<x>abc"), "<x>abc");
    }
}
