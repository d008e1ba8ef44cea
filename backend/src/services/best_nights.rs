//! Best nights of a forecast window.

use std::cmp::Ordering;

use chrono::NaiveDate;

use super::night_quality::assess_night;
use crate::models::{NightForecast, NightQuality};

/// A night with the quality it was ranked by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedNight {
    pub date: NaiveDate,
    pub quality: NightQuality,
}

fn by_quality(a: &RankedNight, b: &RankedNight) -> Ordering {
    b.quality
        .rating
        .cmp(&a.quality.rating)
        .then_with(|| b.quality.score.total_cmp(&a.quality.score))
        .then_with(|| a.date.cmp(&b.date))
}

/// Every night ranked best first: star rating, then continuous score, then date.
pub fn rank_nights(forecasts: &[NightForecast]) -> Vec<RankedNight> {
    let mut ranked: Vec<RankedNight> = forecasts
        .iter()
        .map(|f| RankedNight {
            date: f.date(),
            quality: assess_night(&f.night, f.weather.as_ref()),
        })
        .collect();
    ranked.sort_by(by_quality);
    ranked
}

/// Dates of the `count` best nights.
pub fn select_best_nights(forecasts: &[NightForecast], count: usize) -> Vec<NaiveDate> {
    rank_nights(forecasts)
        .into_iter()
        .take(count)
        .map(|n| n.date)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NightInfo, NightWeather, ScoreTier};
    use chrono::{Duration, TimeZone, Utc};

    fn forecast(day: u32, moon: f64, cloud: Option<f64>) -> NightForecast {
        let date = NaiveDate::from_ymd_opt(2026, 2, day).unwrap();
        let sunset = Utc.with_ymd_and_hms(2026, 2, day, 18, 0, 0).unwrap();
        NightForecast {
            night: NightInfo {
                date,
                sunset,
                sunrise: sunset + Duration::hours(13),
                astronomical_dusk: sunset + Duration::minutes(90),
                astronomical_dawn: sunset + Duration::minutes(690),
                moon_phase: 0.0,
                moon_illumination: moon,
                moon_rise: None,
                moon_set: None,
                seeing_forecast: None,
            },
            weather: cloud.map(|c| NightWeather::from_cloud_cover(date, c, c, c)),
            quality: NightQuality {
                rating: 0,
                tier: ScoreTier::Poor,
                score: 0.0,
            },
            planets: Vec::new(),
            dsos: Vec::new(),
            comets: Vec::new(),
            dwarf_planets: Vec::new(),
            asteroids: Vec::new(),
            moon: None,
            satellite_passes: Vec::new(),
            events: Vec::new(),
        }
    }

    #[test]
    fn test_best_nights_by_rating() {
        let nights = vec![
            forecast(1, 90.0, Some(80.0)),
            forecast(2, 5.0, Some(5.0)),
            forecast(3, 40.0, Some(20.0)),
        ];
        let best = select_best_nights(&nights, 2);
        assert_eq!(
            best,
            vec![
                NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
                NaiveDate::from_ymd_opt(2026, 2, 3).unwrap(),
            ]
        );
    }

    #[test]
    fn test_equal_rating_broken_by_score_then_date() {
        // Both rate 5 stars; the clearer one wins
        let nights = vec![
            forecast(4, 10.0, Some(12.0)),
            forecast(5, 10.0, Some(2.0)),
            forecast(6, 10.0, Some(2.0)),
        ];
        let ranked = rank_nights(&nights);
        let days: Vec<u32> = ranked.iter().map(|r| chrono::Datelike::day(&r.date)).collect();
        assert_eq!(days, vec![5, 6, 4]);
    }

    #[test]
    fn test_missing_weather_counts_as_clear() {
        let nights = vec![forecast(7, 0.0, None), forecast(8, 0.0, Some(60.0))];
        assert_eq!(
            select_best_nights(&nights, 1),
            vec![NaiveDate::from_ymd_opt(2026, 2, 7).unwrap()]
        );
    }

    #[test]
    fn test_count_larger_than_window() {
        let nights = vec![forecast(9, 0.0, None)];
        assert_eq!(select_best_nights(&nights, 3).len(), 1);
        assert!(select_best_nights(&[], 3).is_empty());
    }
}
