use crate::rule::RecurrenceRule;

/// What part of a `RecurrenceRule` a committed edit touched
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RuleChange {
    Period,
    WholeDay,
    PatternType,
    MonthDayMode,
    Interval,
    EveryWorkingDay,
    WeekDays,
    DayOfMonth,
    WeeksOfMonth,
    Month,
    IndividualDates,
    SeriesEnd,
    Exceptions,
    CurrentTillEnd,
    ParentSeries,
    /// The whole rule was swapped, e.g. after decoding a server value
    Replaced,
}

/// Subscriber is a side effect to a committed edit of a `RecurrenceRule`.
///
/// It only ever sees the rule after the edit has been fully applied and it
/// only gets a shared reference, so it cannot edit the rule from within
/// the notification.
pub trait RuleSubscriber {
    fn notify(&self, change: RuleChange, rule: &RecurrenceRule);
}

impl<F> RuleSubscriber for F
where
    F: Fn(RuleChange, &RecurrenceRule),
{
    fn notify(&self, change: RuleChange, rule: &RecurrenceRule) {
        self(change, rule)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The subscribers of one rule. Lives exactly as long as the editor owning
/// the rule.
#[derive(Default)]
pub struct RuleSubscribers {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Box<dyn RuleSubscriber>)>,
}

impl RuleSubscribers {
    pub fn subscribe(&mut self, subscriber: Box<dyn RuleSubscriber>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, subscriber));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let len = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != len
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn notify(&self, change: RuleChange, rule: &RecurrenceRule) {
        for (_, subscriber) in &self.subscribers {
            subscriber.notify(change, rule);
        }
    }
}

impl std::fmt::Debug for RuleSubscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleSubscribers")
            .field("count", &self.subscribers.len())
            .finish()
    }
}
