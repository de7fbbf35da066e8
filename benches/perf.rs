use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::{Value, json};
use std::hint::black_box;

use ipl_ingest::cricapi::parse_envelope;
use ipl_ingest::flatten::flatten;

fn sample_scorecard(match_idx: usize) -> Value {
    let innings = (0..2)
        .map(|inn| {
            let batting = (0..11)
                .map(|b| {
                    json!({
                        "batsman": {"id": format!("p{inn}{b}"), "name": format!("Batter {b}")},
                        "dismissal-text": "c Keeper b Quick",
                        "dismissal": "catch",
                        "bowler": {"id": "q1", "name": "Quick"},
                        "catcher": {"id": "k1", "name": "Keeper"},
                        "r": b * 3, "b": b * 2 + 1, "4s": b % 4, "6s": b % 2, "sr": "123.45"
                    })
                })
                .collect::<Vec<_>>();
            let bowling = (0..6)
                .map(|o| {
                    json!({
                        "bowler": {"id": format!("o{inn}{o}"), "name": format!("Bowler {o}")},
                        "o": 4, "m": 0, "r": 30 + o, "w": o % 3, "nb": 0, "wd": 1, "eco": 7.5
                    })
                })
                .collect::<Vec<_>>();
            json!({
                "inning": format!("Team {inn} Inning 1"),
                "batting": batting,
                "bowling": bowling,
                "catching": [{"catcher": {"id": "k1", "name": "Keeper"}, "catch": 3, "stumped": 1}],
                "extras": {"r": 11, "b": 2}
            })
        })
        .collect::<Vec<_>>();

    json!({
        "id": format!("match-{match_idx}"),
        "name": format!("Home vs Away, {}th Match", match_idx + 4),
        "matchType": "t20",
        "venue": "Eden Gardens, Kolkata",
        "date": "2025-04-01",
        "teams": ["Home", "Away"],
        "score": [
            {"inning": "Team 0 Inning 1", "r": 190, "w": 6, "o": 20},
            {"inning": "Team 1 Inning 1", "r": 191, "w": 3, "o": 18.5}
        ],
        "scorecard": innings
    })
}

fn bench_flatten_batch(c: &mut Criterion) {
    let records = (0..10).map(sample_scorecard).collect::<Vec<_>>();
    c.bench_function("flatten_batch_10", |b| {
        b.iter(|| {
            let tables = flatten(black_box(&records));
            black_box(tables.batting.len());
        })
    });
}

fn bench_envelope_parse(c: &mut Criterion) {
    let body = json!({"status": "success", "data": sample_scorecard(0)}).to_string();
    c.bench_function("envelope_parse", |b| {
        b.iter(|| {
            let data = parse_envelope(black_box(&body)).unwrap();
            black_box(data);
        })
    });
}

criterion_group!(benches, bench_flatten_batch, bench_envelope_parse);
criterion_main!(benches);
