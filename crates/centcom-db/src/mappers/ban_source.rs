//! BanSource entity <-> model mapper

use centcom_core::entities::BanSource;
use centcom_core::error::DomainError;
use centcom_core::value_objects::RoleplayLevel;

use crate::models::BanSourceModel;

/// Convert BanSourceModel to BanSource entity
impl TryFrom<BanSourceModel> for BanSource {
    type Error = DomainError;

    fn try_from(model: BanSourceModel) -> Result<Self, Self::Error> {
        Ok(BanSource {
            name: model.name,
            display: model.display,
            roleplay_level: RoleplayLevel::try_from(model.roleplay_level)?,
        })
    }
}
