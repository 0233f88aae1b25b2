use super::Manager;
use crate::error::{DeepSecurityError, Result};
use crate::mapping::{HintResolver, Record};
use crate::transport::TransportObject;

impl HintResolver for Manager {
    fn resolve_hint(&self, record: &Record, field: &str) -> Result<Option<Record>> {
        let id_field = match field {
            "host_group" => "host_group_id",
            "parent_group" => "parent_group_id",
            _ => return Err(DeepSecurityError::missing_type_mapping(record.class(), field)),
        };
        match record.integer(id_field) {
            Some(id) => self.host_group(id).map(|group| Some(group.into_record())),
            None => Ok(None),
        }
    }
}
