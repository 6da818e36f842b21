use super::command::Alarm;
use super::command::AlarmKind;
use super::command::Command;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Scheduled callbacks owned by a room. Each one sleeps, then posts an
/// [`Alarm`] carrying the generation it was scheduled under back into
/// the room mailbox. Transitions abort every handle and bump the
/// generation, so a handle that slips through the abort still no-ops.
#[derive(Debug, Default)]
pub struct Timers {
    handles: Vec<JoinHandle<()>>,
}

impl Timers {
    pub fn schedule(
        &mut self,
        tx: &UnboundedSender<Command>,
        generation: u64,
        kind: AlarmKind,
        delay: Duration,
    ) {
        let tx = tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Command::Alarm(Alarm { generation, kind }));
        });
        self.handles.push(handle);
    }

    pub fn cancel_all(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}

impl Drop for Timers {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[tokio::test]
    async fn fired_alarm_carries_its_generation() {
        let (tx, mut rx) = unbounded_channel();
        let mut timers = Timers::default();
        timers.schedule(&tx, 7, AlarmKind::PlanningOver, Duration::from_millis(1));
        match rx.recv().await {
            Some(Command::Alarm(alarm)) => {
                assert_eq!(alarm.generation, 7);
                assert_eq!(alarm.kind, AlarmKind::PlanningOver);
            }
            other => panic!("expected alarm, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn cancelled_timers_never_fire() {
        let (tx, mut rx) = unbounded_channel();
        let mut timers = Timers::default();
        timers.schedule(&tx, 1, AlarmKind::ResultsOver, Duration::from_millis(5));
        timers.cancel_all();
        tokio::time::sleep(Duration::from_millis(25)).await;
        assert!(rx.try_recv().is_err());
    }
}
