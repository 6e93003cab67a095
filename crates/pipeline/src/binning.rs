//! Fixed binnings of numeric and boolean attributes into ordered labels.
//!
//! Every binning has one canonical order (the order of its `ALL` constant)
//! which grouping uses as its natural order.

use data_loader::{Game, OperatingSystem};

/// Right-closed ten-dollar price bins with a separate bin for free games
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PriceBin(u8);

impl PriceBin {
    pub const LABELS: [&'static str; 12] = [
        "Free", "(0,10]", "(10,20]", "(20,30]", "(30,40]", "(40,50]", "(50,60]", "(60,70]",
        "(70,80]", "(80,90]", "(90,100]", ">100",
    ];

    /// Bin for a price.
    ///
    /// Example: 0.0 -> Free, 10.0 -> (0,10], 10.01 -> (10,20], 150.0 -> >100
    pub fn of(price: f64) -> Self {
        if price <= 0.0 {
            PriceBin(0)
        } else if price > 100.0 {
            PriceBin(11)
        } else {
            PriceBin((price / 10.0).ceil().clamp(1.0, 10.0) as u8)
        }
    }

    pub fn label(self) -> &'static str {
        Self::LABELS[self.0 as usize]
    }

    /// Position in the canonical order
    pub fn rank(self) -> usize {
        self.0 as usize
    }
}

/// Bins of the number of supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LanguageCountBin {
    One,
    TwoToFour,
    FiveToNine,
    TenPlus,
}

impl LanguageCountBin {
    pub const ALL: [LanguageCountBin; 4] = [
        LanguageCountBin::One,
        LanguageCountBin::TwoToFour,
        LanguageCountBin::FiveToNine,
        LanguageCountBin::TenPlus,
    ];

    /// `None` for a game listed under no language at all
    pub fn of(count: usize) -> Option<Self> {
        match count {
            0 => None,
            1 => Some(LanguageCountBin::One),
            2..=4 => Some(LanguageCountBin::TwoToFour),
            5..=9 => Some(LanguageCountBin::FiveToNine),
            _ => Some(LanguageCountBin::TenPlus),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LanguageCountBin::One => "One",
            LanguageCountBin::TwoToFour => "2-4",
            LanguageCountBin::FiveToNine => "5-9",
            LanguageCountBin::TenPlus => "10+",
        }
    }

    pub fn rank(self) -> usize {
        self as usize
    }
}

/// Canonical order of OS combination labels
pub const OS_COMBINATIONS: [&str; 7] = ["W", "M", "L", "W+M", "W+L", "M+L", "W+M+L"];

/// Initials of every supported OS joined with `+`, Windows first.
///
/// Example: Windows and Linux -> "W+L". `None` when no OS flag is set.
pub fn os_combination(game: &Game) -> Option<String> {
    let initials: Vec<String> = game
        .operating_systems()
        .map(|os| os.initial().to_string())
        .collect();
    if initials.is_empty() {
        None
    } else {
        Some(initials.join("+"))
    }
}

/// Position of a combination label in [`OS_COMBINATIONS`]
pub fn os_combination_rank(label: &str) -> usize {
    OS_COMBINATIONS
        .iter()
        .position(|c| *c == label)
        .unwrap_or(OS_COMBINATIONS.len())
}

/// Number of supported operating systems
pub fn os_count(game: &Game) -> usize {
    OperatingSystem::ALL
        .into_iter()
        .filter(|os| game.supports(*os))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(windows: bool, mac: bool, linux: bool) -> Game {
        Game {
            id: 1,
            name: "Test".to_string(),
            release_date: None,
            price: 0.0,
            average_playtime: 0.0,
            peak_ccu: 0.0,
            reviews: 0.0,
            recommendations: 0.0,
            review_score: None,
            windows,
            mac,
            linux,
        }
    }

    #[test]
    fn test_price_bins() {
        assert_eq!(PriceBin::of(0.0).label(), "Free");
        assert_eq!(PriceBin::of(0.99).label(), "(0,10]");
        assert_eq!(PriceBin::of(10.0).label(), "(0,10]");
        assert_eq!(PriceBin::of(10.01).label(), "(10,20]");
        assert_eq!(PriceBin::of(100.0).label(), "(90,100]");
        assert_eq!(PriceBin::of(150.0).label(), ">100");
        assert!(PriceBin::of(0.0) < PriceBin::of(5.0));
    }

    #[test]
    fn test_language_count_bins() {
        assert_eq!(LanguageCountBin::of(0), None);
        assert_eq!(LanguageCountBin::of(1), Some(LanguageCountBin::One));
        assert_eq!(LanguageCountBin::of(4).map(LanguageCountBin::label), Some("2-4"));
        assert_eq!(LanguageCountBin::of(5).map(LanguageCountBin::label), Some("5-9"));
        assert_eq!(LanguageCountBin::of(9).map(LanguageCountBin::label), Some("5-9"));
        assert_eq!(LanguageCountBin::of(10).map(LanguageCountBin::label), Some("10+"));
    }

    #[test]
    fn test_os_combination_and_count() {
        let g = game(true, false, true);
        assert_eq!(os_combination(&g).as_deref(), Some("W+L"));
        assert_eq!(os_count(&g), 2);

        let all = game(true, true, true);
        assert_eq!(os_combination(&all).as_deref(), Some("W+M+L"));
        assert_eq!(os_combination_rank("W+M+L"), 6);

        assert_eq!(os_combination(&game(false, false, false)), None);
    }
}
