use chrono::NaiveDate;
use prodle::{
    GameEngine, GameMode, GameStatus, MemoryStore, RosterData, RosterLoader, daily_target,
};
use std::convert::Infallible;

struct SyntheticLoader {
    players: u32,
}

impl RosterLoader for SyntheticLoader {
    type Error = Infallible;

    fn load_roster(&self) -> Result<RosterData, Self::Error> {
        let mut entries = Vec::new();
        for i in 0..self.players {
            let retired = i % 3 == 0;
            let team = if retired {
                String::new()
            } else {
                format!(r#""current_team": "Team{}", "current_team_region": "LCK", "current_role": "Mid","#, i % 4)
            };
            entries.push(format!(
                r#""Player{i:02}": {{
                    "mainName": "Player{i:02}",
                    "allNames": ["Player{i:02}", "Alias{i:02}"],
                    "nationality": "South Korea",
                    "Residency": "Korea",
                    "birthdate": "199{}-0{}-1{}",
                    "tournament_role": "Mid",
                    {team}
                    "appearance": {},
                    "isRetired": {}
                }}"#,
                i % 10,
                i % 9 + 1,
                i % 9,
                i % 9,
                retired
            ));
        }
        let json = format!("{{{}}}", entries.join(","));
        Ok(RosterData::from_json(&json).unwrap())
    }
}

fn engine() -> GameEngine<SyntheticLoader, MemoryStore> {
    let _ = env_logger::builder().is_test(true).try_init();
    GameEngine::new(SyntheticLoader { players: 24 }, MemoryStore::new())
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, day).unwrap()
}

#[test]
fn same_date_derives_the_same_target_across_engines() {
    // Two independent engines (separate stores, separate roster loads) must
    // agree on the daily target without any coordination.
    let first = engine();
    let second = engine();
    let a = first.start_daily(date(23)).unwrap();
    let b = second.start_daily(date(23)).unwrap();
    assert_eq!(a.target().primary_name, b.target().primary_name);
}

#[test]
fn rollover_draws_a_fresh_target_and_discards_the_old_session() {
    let engine = engine();
    let roster = engine.roster().unwrap();

    let mut yesterday = engine.start_daily(date(22)).unwrap();
    let wrong = roster
        .players()
        .find(|p| p.primary_name != yesterday.target().primary_name)
        .unwrap()
        .primary_name
        .clone();
    yesterday.submit_guess(&roster, &wrong, date(22)).unwrap();
    engine.save_session(&yesterday, Some(date(22))).unwrap();

    // Same date resumes the in-progress game.
    let resumed = engine.start_daily(date(22)).unwrap();
    assert_eq!(resumed.guesses().len(), 1);
    assert_eq!(resumed.status(), GameStatus::Playing);

    // The next day starts clean, against that day's own target.
    let next = engine.start_daily(date(23)).unwrap();
    assert!(next.guesses().is_empty());
    let expected = daily_target(
        &roster,
        &engine.repository().weights(GameMode::Daily),
        engine.repository().retired_probability(GameMode::Daily),
        date(23),
    )
    .unwrap();
    assert_eq!(next.target().primary_name, expected.primary_name);
}

#[test]
fn cached_target_survives_even_if_settings_change_mid_day() {
    let engine = engine();
    let first = engine.start_daily(date(23)).unwrap();

    // Changing weights mid-day must not change today's already-drawn target.
    engine
        .repository()
        .set_retired_probability(GameMode::Daily, 100)
        .unwrap();
    let second = engine.start_daily(date(23)).unwrap();
    assert_eq!(first.target().primary_name, second.target().primary_name);
}

#[test]
fn finished_daily_game_stays_finished_for_the_day() {
    let engine = engine();
    let roster = engine.roster().unwrap();

    let mut session = engine.start_daily(date(23)).unwrap();
    let answer = session.target().primary_name.clone();
    session.submit_guess(&roster, &answer, date(23)).unwrap();
    assert_eq!(session.status(), GameStatus::Won);
    engine.save_session(&session, Some(date(23))).unwrap();
    engine.record_outcome(&session).unwrap();

    let reopened = engine.start_daily(date(23)).unwrap();
    assert_eq!(reopened.status(), GameStatus::Won);
    assert_eq!(reopened.guesses().len(), 1);

    let stats = engine.repository().stats(GameMode::Daily);
    assert_eq!(stats.played, 1);
    assert_eq!(stats.current_streak, 1);
}
