//! String-backed status enums shared by entities and services.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[sea_orm(string_value = "waiting")]
    Waiting,
    #[sea_orm(string_value = "seated")]
    Seated,
    #[sea_orm(string_value = "done")]
    Done,
    #[sea_orm(string_value = "canceled")]
    Canceled,
}

impl BookingStatus {
    /// `waiting -> seated | canceled`, `seated -> done`; staying put is allowed
    /// for the non-terminal states.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Waiting, Waiting) | (Waiting, Seated) | (Waiting, Canceled) | (Seated, Seated) | (Seated, Done)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Done | BookingStatus::Canceled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    #[sea_orm(string_value = "ready")]
    Ready,
    #[sea_orm(string_value = "booked")]
    Booked,
    #[sea_orm(string_value = "occupied")]
    Occupied,
}

/// Approval state of warehouse documents and their lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum AcceptStatus {
    #[sea_orm(string_value = "waiting_approve")]
    WaitingApprove,
    #[sea_orm(string_value = "approve")]
    Approve,
    #[sea_orm(string_value = "reject")]
    Reject,
}

impl AcceptStatus {
    /// Only documents still waiting may change; `approve` and `reject` are final.
    pub fn can_transition_to(self, _next: AcceptStatus) -> bool {
        self == AcceptStatus::WaitingApprove
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum PromotionStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

macro_rules! impl_text {
    ($($t:ty),* $(,)?) => {$(
        impl std::str::FromStr for $t {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$t as ActiveEnum>::try_from_value(&s.trim().to_lowercase())
                    .map_err(|_| format!("invalid {} `{}`", stringify!($t), s))
            }
        }

        impl std::fmt::Display for $t {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.to_value())
            }
        }
    )*};
}

impl_text!(BookingStatus, TableStatus, AcceptStatus, PromotionStatus, UserStatus);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_transitions() {
        use BookingStatus::*;
        assert!(Waiting.can_transition_to(Seated));
        assert!(Waiting.can_transition_to(Canceled));
        assert!(Seated.can_transition_to(Done));
        assert!(!Seated.can_transition_to(Waiting));
        assert!(!Done.can_transition_to(Waiting));
        assert!(!Canceled.can_transition_to(Canceled));
        assert!(Done.is_terminal() && Canceled.is_terminal() && !Seated.is_terminal());
    }

    #[test]
    fn accept_status_is_final_once_decided() {
        use AcceptStatus::*;
        assert!(WaitingApprove.can_transition_to(Approve));
        assert!(WaitingApprove.can_transition_to(Reject));
        assert!(!Approve.can_transition_to(Reject));
        assert!(!Reject.can_transition_to(Approve));
        assert!(!Approve.can_transition_to(Approve));
    }

    #[test]
    fn parses_and_displays_wire_values() {
        assert_eq!("WAITING_APPROVE".parse::<AcceptStatus>().unwrap(), AcceptStatus::WaitingApprove);
        assert_eq!(TableStatus::Occupied.to_string(), "occupied");
        assert!("seated?".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn serde_matches_db_value() {
        let v = serde_json::to_value(AcceptStatus::WaitingApprove).unwrap();
        assert_eq!(v, serde_json::json!("waiting_approve"));
        assert_eq!(v.as_str().unwrap(), AcceptStatus::WaitingApprove.to_value());
    }
}
