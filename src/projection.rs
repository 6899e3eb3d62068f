use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CrsLabel {
    Geographic,
    Mercator,
    #[default]
    Utm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    #[default]
    North,
    South,
}

/// Coordinate reference system of the field and paths. The UTM zone fields
/// are ignored unless `crs_label` is `Utm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Projection {
    pub crs_label: CrsLabel,
    pub utm_zone_num: u8,
    pub utm_zone_hemi: Hemisphere,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            crs_label: CrsLabel::Utm,
            utm_zone_num: 52,
            utm_zone_hemi: Hemisphere::North,
        }
    }
}

const EPSG_GEOGRAPHIC: u32 = 4326;
const EPSG_WEB_MERCATOR: u32 = 3857;
const EPSG_UTM_NORTH: u32 = 32600;
const EPSG_UTM_SOUTH: u32 = 32700;

impl Projection {
    pub fn geographic() -> Self {
        Self {
            crs_label: CrsLabel::Geographic,
            ..Self::default()
        }
    }

    pub fn mercator() -> Self {
        Self {
            crs_label: CrsLabel::Mercator,
            ..Self::default()
        }
    }

    pub fn utm(zone: u8, hemi: Hemisphere) -> Result<Self> {
        let p = Self {
            crs_label: CrsLabel::Utm,
            utm_zone_num: zone,
            utm_zone_hemi: hemi,
        };
        p.validate()?;
        Ok(p)
    }

    pub fn validate(&self) -> Result<()> {
        if self.crs_label == CrsLabel::Utm && !(1..=60).contains(&self.utm_zone_num) {
            return Err(Error::invalid(format!(
                "UTM zone must be in 1..=60, got {}",
                self.utm_zone_num
            )));
        }
        Ok(())
    }

    pub fn epsg(&self) -> u32 {
        match self.crs_label {
            CrsLabel::Geographic => EPSG_GEOGRAPHIC,
            CrsLabel::Mercator => EPSG_WEB_MERCATOR,
            CrsLabel::Utm => {
                let base = match self.utm_zone_hemi {
                    Hemisphere::North => EPSG_UTM_NORTH,
                    Hemisphere::South => EPSG_UTM_SOUTH,
                };
                base + self.utm_zone_num as u32
            }
        }
    }

    pub fn from_epsg(code: u32) -> Result<Self> {
        match code {
            EPSG_GEOGRAPHIC => Ok(Self::geographic()),
            EPSG_WEB_MERCATOR => Ok(Self::mercator()),
            c if (EPSG_UTM_NORTH + 1..=EPSG_UTM_NORTH + 60).contains(&c) => {
                Self::utm((c - EPSG_UTM_NORTH) as u8, Hemisphere::North)
            }
            c if (EPSG_UTM_SOUTH + 1..=EPSG_UTM_SOUTH + 60).contains(&c) => {
                Self::utm((c - EPSG_UTM_SOUTH) as u8, Hemisphere::South)
            }
            _ => Err(Error::UnknownProjection(code)),
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.crs_label {
            CrsLabel::Geographic => write!(f, "Geographic"),
            CrsLabel::Mercator => write!(f, "Mercator"),
            CrsLabel::Utm => {
                let hemi = match self.utm_zone_hemi {
                    Hemisphere::North => 'N',
                    Hemisphere::South => 'S',
                };
                write!(f, "UTM {}{hemi}", self.utm_zone_num)
            }
        }
    }
}
