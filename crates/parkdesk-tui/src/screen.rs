//! Screen identifiers.

use std::fmt;

/// Primary screens, navigable by number keys 1-4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Dashboard,
    Registrations,
    Users,
    Vehicles,
    /// Login form; not in the tab bar.
    Login,
}

impl ScreenId {
    /// Screens in tab-bar order.
    pub const ALL: [ScreenId; 4] = [
        Self::Dashboard,
        Self::Registrations,
        Self::Users,
        Self::Vehicles,
    ];

    pub fn number(self) -> u8 {
        match self {
            Self::Dashboard => 1,
            Self::Registrations => 2,
            Self::Users => 3,
            Self::Vehicles => 4,
            Self::Login => 0,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Dashboard),
            2 => Some(Self::Registrations),
            3 => Some(Self::Users),
            4 => Some(Self::Vehicles),
            _ => None,
        }
    }

    /// Next screen in tab order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Tổng quan",
            Self::Registrations => "Đăng ký tháng",
            Self::Users => "Khách hàng",
            Self::Vehicles => "Xe",
            Self::Login => "Đăng nhập",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_order_wraps() {
        assert_eq!(ScreenId::Vehicles.next(), ScreenId::Dashboard);
        assert_eq!(ScreenId::Dashboard.prev(), ScreenId::Vehicles);
        assert_eq!(ScreenId::from_number(2), Some(ScreenId::Registrations));
        assert_eq!(ScreenId::from_number(5), None);
    }
}
