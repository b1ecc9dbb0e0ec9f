use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "canceled")]
    Canceled,
}

impl AppointmentStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Canceled)
    }

    pub fn is_upcoming(self) -> bool {
        !self.is_terminal()
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum AnimalTarget {
    #[sea_orm(string_value = "dog")]
    Dog,
    #[sea_orm(string_value = "cat")]
    Cat,
    #[sea_orm(string_value = "bird")]
    Bird,
    #[sea_orm(string_value = "fish")]
    Fish,
    #[sea_orm(string_value = "rodent")]
    Rodent,
    #[sea_orm(string_value = "reptile")]
    Reptile,
    #[sea_orm(string_value = "all")]
    All,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum AnimalSize {
    #[sea_orm(string_value = "small")]
    Small,
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "large")]
    Large,
    #[sea_orm(string_value = "all")]
    All,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum AnimalAge {
    #[sea_orm(string_value = "young")]
    Young,
    #[sea_orm(string_value = "adult")]
    Adult,
    #[sea_orm(string_value = "senior")]
    Senior,
    #[sea_orm(string_value = "all")]
    All,
}
