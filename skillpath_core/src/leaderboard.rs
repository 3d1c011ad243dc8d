//! Leaderboard ranking and university standings.

use crate::{Athlete, RankedAthlete, SkillLevel, UniversityStanding};
use std::collections::HashMap;

/// Rank athletes by points, highest first
///
/// Uses standard competition ranking: tied athletes share a rank and the
/// next rank skips accordingly (1, 2, 2, 4). Ties keep input order.
pub fn rank_athletes(athletes: &[Athlete]) -> Vec<RankedAthlete> {
    let mut sorted: Vec<&Athlete> = athletes.iter().collect();
    sorted.sort_by(|a, b| b.points.cmp(&a.points));

    let mut ranked: Vec<RankedAthlete> = Vec::with_capacity(sorted.len());
    for (position, athlete) in sorted.into_iter().enumerate() {
        let rank = match ranked.last() {
            Some(prev) if prev.athlete.points == athlete.points => prev.rank,
            _ => position + 1,
        };
        ranked.push(RankedAthlete {
            rank,
            athlete: athlete.clone(),
        });
    }
    ranked
}

/// Per-university member count and average points
///
/// Sorted by average points (descending), then by name.
pub fn university_standings(athletes: &[Athlete]) -> Vec<UniversityStanding> {
    let mut totals: HashMap<&str, (usize, u64)> = HashMap::new();
    for athlete in athletes {
        let entry = totals.entry(athlete.university.as_str()).or_default();
        entry.0 += 1;
        entry.1 += u64::from(athlete.points);
    }

    let mut standings: Vec<UniversityStanding> = totals
        .into_iter()
        .map(|(name, (members, points))| UniversityStanding {
            name: name.to_string(),
            members,
            avg_points: (points / members as u64) as u32,
        })
        .collect();

    standings.sort_by(|a, b| b.avg_points.cmp(&a.avg_points).then_with(|| a.name.cmp(&b.name)));
    standings
}

/// Built-in leaderboard fixture
pub fn default_leaderboard() -> Vec<Athlete> {
    let athlete = |name: &str, university: &str, city: &str, points, level, streak_days| Athlete {
        name: name.into(),
        university: university.into(),
        city: Some(city.into()),
        points,
        level,
        streak_days,
    };

    vec![
        athlete("Alex Chen", "MIT", "Cambridge", 5420, SkillLevel::Elite, 45),
        athlete("Sarah Johnson", "Harvard", "Boston", 5180, SkillLevel::Elite, 32),
        athlete("Mike Rodriguez", "Stanford", "Palo Alto", 4950, SkillLevel::Advanced, 28),
        athlete("Emma Thompson", "Berkeley", "Berkeley", 4720, SkillLevel::Advanced, 22),
        athlete("David Kim", "Caltech", "Pasadena", 4560, SkillLevel::Advanced, 19),
        athlete("Priya Nair", "Harvard", "Boston", 3880, SkillLevel::Intermediate, 12),
        athlete("Tom Becker", "MIT", "Cambridge", 3410, SkillLevel::Intermediate, 9),
    ]
}
