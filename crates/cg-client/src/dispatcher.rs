//! Runs fetches off the UI loop and hands back one event per fetch.
//!
//! The UI owns a [`Dispatcher`] and the matching receiver. Each call to
//! [`Dispatcher::dispatch`] spawns the operation on the runtime and returns a
//! [`Ticket`]. When the operation finishes, exactly one [`Delivery`] carrying
//! that ticket lands in the queue. A later dispatch of the same [`IntentKind`]
//! cancels the earlier one: its task stops and its result is never sent.
//! Anything already queued is caught by [`Dispatcher::accept`]. An operation
//! that panics still produces its one event, built by [`PanicEvent`].

use std::collections::HashMap;
use std::future::Future;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// Category of work. At most one operation per kind is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentKind {
  Global,
  Coin,
}

/// Identity of one dispatched operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
  pub kind: IntentKind,
  pub seq: u64,
}

/// A finished operation's event, tagged with the ticket it was issued under
#[derive(Debug)]
pub struct Delivery<E> {
  pub ticket: Ticket,
  pub event: E,
}

/// Event standing in for an operation that panicked instead of finishing
pub trait PanicEvent {
  fn from_panic(kind: IntentKind, reason: String) -> Self;
}

#[derive(Debug)]
struct InFlight {
  ticket: Ticket,
  token: CancellationToken,
}

/// Spawns operations and tracks the live one per kind
#[derive(Debug)]
pub struct Dispatcher<E> {
  handle: Handle,
  tx: UnboundedSender<Delivery<E>>,
  in_flight: HashMap<IntentKind, InFlight>,
  next_seq: u64,
}

impl<E> Dispatcher<E>
where
  E: PanicEvent + Send + 'static,
{
  /// Create a dispatcher spawning onto `handle`, plus its event queue
  pub fn new(handle: Handle) -> (Self, UnboundedReceiver<Delivery<E>>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Self { handle, tx, in_flight: HashMap::new(), next_seq: 0 }, rx)
  }

  /// Run `op` on the runtime and deliver its output as one event.
  ///
  /// `op` receives the cancellation token for this dispatch. The previous
  /// operation of the same kind, if still live, is cancelled first.
  pub fn dispatch<F, Fut>(&mut self, kind: IntentKind, op: F) -> Ticket
  where
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = E> + Send + 'static,
  {
    self.next_seq += 1;
    let ticket = Ticket { kind, seq: self.next_seq };
    let token = CancellationToken::new();

    if let Some(previous) =
      self.in_flight.insert(kind, InFlight { ticket, token: token.clone() })
    {
      debug!("Cancelling {:?} #{} superseded by #{}", kind, previous.ticket.seq, ticket.seq);
      previous.token.cancel();
    }

    let work = self.handle.spawn(op(token.clone()));
    let tx = self.tx.clone();
    self.handle.spawn(async move {
      let abort = work.abort_handle();
      tokio::select! {
        biased;
        _ = token.cancelled() => {
          abort.abort();
          debug!("{:?} #{} cancelled before completion", ticket.kind, ticket.seq);
        }
        joined = work => {
          if token.is_cancelled() {
            return;
          }
          let event = match joined {
            Ok(event) => event,
            Err(e) => {
              error!("{:?} #{} did not complete: {}", ticket.kind, ticket.seq, e);
              E::from_panic(ticket.kind, e.to_string())
            }
          };
          if tx.send(Delivery { ticket, event }).is_err() {
            debug!("Event queue closed; dropping {:?} #{}", ticket.kind, ticket.seq);
          }
        }
      }
    });

    ticket
  }

  /// Settle a received delivery.
  ///
  /// Returns true if `ticket` is the live operation of its kind, which then
  /// stops being live. A superseded ticket returns false and should be ignored.
  pub fn accept(&mut self, ticket: &Ticket) -> bool {
    match self.in_flight.get(&ticket.kind) {
      Some(live) if live.ticket == *ticket => {
        self.in_flight.remove(&ticket.kind);
        true
      }
      _ => {
        debug!("Dropping stale {:?} #{}", ticket.kind, ticket.seq);
        false
      }
    }
  }

  /// True while an operation of `kind` is dispatched and not yet accepted
  pub fn is_pending(&self, kind: IntentKind) -> bool {
    self.in_flight.contains_key(&kind)
  }

  /// Cancel the live operation of `kind`, if any
  pub fn cancel(&mut self, kind: IntentKind) {
    if let Some(live) = self.in_flight.remove(&kind) {
      debug!("Cancelling {:?} #{}", kind, live.ticket.seq);
      live.token.cancel();
    }
  }

  /// Cancel every live operation
  pub fn cancel_all(&mut self) {
    for (_, live) in self.in_flight.drain() {
      live.token.cancel();
    }
  }
}

impl<E> Drop for Dispatcher<E> {
  fn drop(&mut self) {
    for live in self.in_flight.values() {
      live.token.cancel();
    }
  }
}
