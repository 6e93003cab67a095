//! Filter to keep games released inside a window of years.

use crate::traits::Filter;
use data_loader::Game;

/// Keeps games whose release year lies in `from..=to`.
///
/// Games with an unknown release date are dropped, since they cannot be
/// placed inside the window.
pub struct ReleaseWindowFilter {
    from: i32,
    to: i32,
    name: String,
}

impl ReleaseWindowFilter {
    pub fn new(from: i32, to: i32) -> Self {
        Self {
            from,
            to,
            name: format!("ReleaseWindowFilter({from}..={to})"),
        }
    }
}

impl Filter for ReleaseWindowFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply<'a>(&self, games: Vec<&'a Game>) -> Vec<&'a Game> {
        games
            .into_iter()
            .filter(|game| {
                game.release_year()
                    .is_some_and(|year| self.from <= year && year <= self.to)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn game(id: u32, release_date: Option<NaiveDate>) -> Game {
        Game {
            id,
            name: format!("Game {id}"),
            release_date,
            price: 0.0,
            average_playtime: 0.0,
            peak_ccu: 0.0,
            reviews: 0.0,
            recommendations: 0.0,
            review_score: None,
            windows: true,
            mac: false,
            linux: false,
        }
    }

    #[test]
    fn test_release_window() {
        let games = [
            game(1, NaiveDate::from_ymd_opt(2014, 12, 31)),
            game(2, NaiveDate::from_ymd_opt(2015, 1, 1)),
            game(3, NaiveDate::from_ymd_opt(2016, 12, 31)),
            game(4, None),
        ];
        let filter = ReleaseWindowFilter::new(2015, 2016);

        let kept = filter.apply(games.iter().collect());
        assert_eq!(kept.iter().map(|g| g.id).collect::<Vec<_>>(), vec![2, 3]);
    }
}
