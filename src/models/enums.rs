//! Shared domain enums, stored as text codes in the database

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, Postgres};
use utoipa::ToSchema;

/// Declares an enum backed by a text code, with serde, display, parsing and
/// SQLx conversions that all go through the same code.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $code:literal, $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $code)] $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Database / wire code
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }

            /// Display label
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| format!("Invalid {}: {}", stringify!($name), s))
            }
        }

        impl sqlx::Type<Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<Postgres>>::compatible(ty)
            }
        }

        impl<'r> Decode<'r, Postgres> for $name {
            fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
                let s: &str = Decode::<Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl Encode<'_, Postgres> for $name {
            fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
                <&str as Encode<Postgres>>::encode(self.as_str(), buf)
            }
        }
    };
}

text_enum! {
    /// Kind of entity a document belongs to
    pub enum EntityKind {
        Vehicle => "VEHICLE", "Vehicle",
        Trailer => "TRAILER", "Trailer",
        Driver => "DRIVER", "Driver",
    }
}

text_enum! {
    /// Compliance document category
    pub enum DocumentCategory {
        Licencia => "LICENCIA", "Licencia de Conducir",
        Extintor => "EXTINTOR", "Extintor",
        RevisionTecnica => "REVISION_TECNICA", "Revisión Técnica",
        Seguro => "SEGURO", "Seguro",
        Soap => "SOAP", "SOAP",
        PermisoCirculacion => "PERMISO_CIRCULACION", "Permiso de Circulación",
        Tc8 => "TC8", "TC8",
        /// Registration, usually without expiry
        Padron => "PADRON", "Padrón",
        /// Generated inspection report
        Inspeccion => "INSPECCION", "Informe de Inspección",
    }
}

text_enum! {
    /// Operational state of a tractor
    pub enum OperationalState {
        Operativo => "OPERATIVO", "Operativo",
        EnMantencion => "EN_MANTENCION", "En mantención",
        FueraDeServicio => "FUERA_DE_SERVICIO", "Fuera de servicio",
        EnRuta => "EN_RUTA", "En ruta",
    }
}

text_enum! {
    /// Operational state of a trailer
    pub enum TrailerState {
        Operativo => "OPERATIVO", "Operativo",
        EnMantencion => "EN_MANTENCION", "En mantención",
        FueraDeServicio => "FUERA_DE_SERVICIO", "Fuera de servicio",
    }
}

text_enum! {
    /// Maintenance workshop
    pub enum Workshop {
        Zmc => "ZMC", "ZMC",
        Kaufmann => "KAUFMANN", "Kaufmann",
    }
}

text_enum! {
    /// Operational role of a tractor in the fleet
    pub enum OperationalRole {
        Titular => "TITULAR", "Titular",
        Backup => "BACKUP", "Backup",
    }
}

text_enum! {
    /// Inspection checklist type
    pub enum InspectionType {
        Diaria => "DIARIA", "Inspección diaria",
        MantencionTecnica => "MANTENCION_TECNICA", "Mantención técnica",
    }
}

text_enum! {
    /// Checklist item result
    pub enum ItemCondition {
        Bueno => "B", "Bueno",
        Regular => "R", "Regular",
        Malo => "M", "Malo",
    }
}

text_enum! {
    /// Staff role
    pub enum Role {
        Admin => "admin", "Administrator",
        Inspector => "inspector", "Inspector",
        Viewer => "viewer", "Viewer",
    }
}

impl Default for ItemCondition {
    fn default() -> Self {
        ItemCondition::Bueno
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("revision_tecnica".parse::<DocumentCategory>(), Ok(DocumentCategory::RevisionTecnica));
        assert_eq!("m".parse::<ItemCondition>(), Ok(ItemCondition::Malo));
        assert!("XX".parse::<Workshop>().is_err());
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&OperationalState::EnMantencion).unwrap();
        assert_eq!(json, "\"EN_MANTENCION\"");
        let cond: ItemCondition = serde_json::from_str("\"R\"").unwrap();
        assert_eq!(cond, ItemCondition::Regular);
    }

    #[test]
    fn test_display_matches_code() {
        for category in DocumentCategory::ALL {
            assert_eq!(category.to_string(), category.as_str());
        }
    }
}
