use super::transport_object;
use crate::enums::EVENT_ORIGIN;
use crate::mapping::Schema;
use chrono::{DateTime, FixedOffset};

transport_object!(
    /// A manager system event, such as a configuration change or a security
    /// update applied to a computer.
    SystemEvent = "SystemEvent"
);

pub(crate) fn schema() -> Schema {
    Schema::builder("SystemEvent")
        .string("action_performed_by", "User or process that performed the action")
        .string("description", "Event description")
        .string("event", "Event name")
        .integer("event_id", "Event type ID")
        .enumeration("event_origin", &EVENT_ORIGIN, "Where the event originated")
        .string("manager_hostname", "Manager node that recorded the event")
        .integer("system_event_id", "System event ID")
        .string("tags", "Tags attached to the event")
        .string("target", "Name of the event target")
        .integer("target_id", "ID of the event target")
        .string("target_type", "Type of the event target")
        .datetime("time", "Time the event occurred")
        .string("type", "Event severity type")
        .build()
}

impl SystemEvent {
    pub fn system_event_id(&self) -> Option<i64> {
        self.0.integer("system_event_id")
    }

    pub fn event_id(&self) -> Option<i64> {
        self.0.integer("event_id")
    }

    pub fn event(&self) -> Option<&str> {
        self.0.string("event")
    }

    pub fn event_origin(&self) -> Option<&'static str> {
        self.0.symbol("event_origin")
    }

    pub fn target(&self) -> Option<&str> {
        self.0.string("target")
    }

    pub fn time(&self) -> Option<DateTime<FixedOffset>> {
        self.0.datetime("time")
    }
}
