// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Zoneplan-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Zoneplan and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fill colors offered by the context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ZoneColor {
    #[default]
    White,
    Coral,
    Amber,
    Lime,
    Aqua,
    Periwinkle,
}

impl ZoneColor {
    pub const PALETTE: [ZoneColor; 6] = [
        ZoneColor::White,
        ZoneColor::Coral,
        ZoneColor::Amber,
        ZoneColor::Lime,
        ZoneColor::Aqua,
        ZoneColor::Periwinkle,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            Self::White => "#ffffff",
            Self::Coral => "#f28b82",
            Self::Amber => "#fbbc04",
            Self::Lime => "#ccff90",
            Self::Aqua => "#a7ffeb",
            Self::Periwinkle => "#aecbfa",
        }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::White => (0xff, 0xff, 0xff),
            Self::Coral => (0xf2, 0x8b, 0x82),
            Self::Amber => (0xfb, 0xbc, 0x04),
            Self::Lime => (0xcc, 0xff, 0x90),
            Self::Aqua => (0xa7, 0xff, 0xeb),
            Self::Periwinkle => (0xae, 0xcb, 0xfa),
        }
    }

    /// Next palette entry, wrapping around.
    pub fn next(self) -> Self {
        let index = Self::PALETTE.iter().position(|c| *c == self).unwrap_or(0);
        Self::PALETTE[(index + 1) % Self::PALETTE.len()]
    }
}

impl fmt::Display for ZoneColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a palette color")]
pub struct UnknownColorError(pub String);

impl FromStr for ZoneColor {
    type Err = UnknownColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        if normalized == "#fff" {
            return Ok(Self::White);
        }
        Self::PALETTE
            .iter()
            .copied()
            .find(|color| color.hex() == normalized)
            .ok_or_else(|| UnknownColorError(s.to_owned()))
    }
}

impl Serialize for ZoneColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.hex())
    }
}

impl<'de> Deserialize<'de> for ZoneColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
