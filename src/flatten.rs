use serde::Serialize;
use serde_json::Value;

use crate::field::Field;

/// A flattened row type that knows its own CSV column order.
pub trait TableRow: Serialize {
    const HEADERS: &'static [&'static str];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Matches,
    Innings,
    Batting,
    Bowling,
    Fielding,
    Extras,
}

impl Table {
    pub const ALL: [Table; 6] = [
        Table::Matches,
        Table::Innings,
        Table::Batting,
        Table::Bowling,
        Table::Fielding,
        Table::Extras,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Table::Matches => "matches_df.csv",
            Table::Innings => "innings_df.csv",
            Table::Batting => "batting_df.csv",
            Table::Bowling => "bowling_df.csv",
            Table::Fielding => "fielding_df.csv",
            Table::Extras => "extras_df.csv",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRow {
    pub match_id: Option<String>,
    pub series_id: Option<String>,
    pub match_name: Option<String>,
    pub match_type: Option<String>,
    pub status: Option<String>,
    pub venue: Option<String>,
    pub date: Option<String>,
    pub team1: Option<String>,
    pub team2: Option<String>,
    pub toss_winner: Option<String>,
    pub toss_choice: Option<String>,
    pub match_winner: Option<String>,
}

impl TableRow for MatchRow {
    const HEADERS: &'static [&'static str] = &[
        "match_id",
        "series_id",
        "match_name",
        "match_type",
        "status",
        "venue",
        "date",
        "team1",
        "team2",
        "toss_winner",
        "toss_choice",
        "match_winner",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InningsRow {
    pub match_id: Option<String>,
    pub inning_name: Option<String>,
    pub runs: Option<i64>,
    pub wickets: Option<i64>,
    pub overs: Option<f64>,
}

impl TableRow for InningsRow {
    const HEADERS: &'static [&'static str] =
        &["match_id", "inning_name", "runs", "wickets", "overs"];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattingRow {
    pub match_id: Option<String>,
    pub inning_name: Option<String>,
    pub batsman_id: Option<String>,
    pub batsman_name: Option<String>,
    pub runs: Option<i64>,
    pub balls: Option<i64>,
    pub fours: Option<i64>,
    pub sixes: Option<i64>,
    pub strike_rate: Option<f64>,
    pub dismissal: Option<String>,
    pub dismissal_text: Option<String>,
    pub bowler_id: Option<String>,
    pub bowler_name: Option<String>,
    pub catcher_id: Option<String>,
    pub catcher_name: Option<String>,
}

impl TableRow for BattingRow {
    const HEADERS: &'static [&'static str] = &[
        "match_id",
        "inning_name",
        "batsman_id",
        "batsman_name",
        "runs",
        "balls",
        "fours",
        "sixes",
        "strike_rate",
        "dismissal",
        "dismissal_text",
        "bowler_id",
        "bowler_name",
        "catcher_id",
        "catcher_name",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BowlingRow {
    pub match_id: Option<String>,
    pub inning_name: Option<String>,
    pub bowler_id: Option<String>,
    pub bowler_name: Option<String>,
    pub overs: Option<f64>,
    pub maidens: Option<i64>,
    pub runs_conceded: Option<i64>,
    pub wickets: Option<i64>,
    pub no_balls: Option<i64>,
    pub wides: Option<i64>,
    pub economy: Option<f64>,
}

impl TableRow for BowlingRow {
    const HEADERS: &'static [&'static str] = &[
        "match_id",
        "inning_name",
        "bowler_id",
        "bowler_name",
        "overs",
        "maidens",
        "runs_conceded",
        "wickets",
        "no_balls",
        "wides",
        "economy",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldingRow {
    pub match_id: Option<String>,
    pub inning_name: Option<String>,
    pub fielder_id: Option<String>,
    pub fielder_name: Option<String>,
    pub catches: Option<i64>,
    pub stumpings: Option<i64>,
    pub runouts: Option<i64>,
    pub bowled: Option<i64>,
}

impl TableRow for FieldingRow {
    const HEADERS: &'static [&'static str] = &[
        "match_id",
        "inning_name",
        "fielder_id",
        "fielder_name",
        "catches",
        "stumpings",
        "runouts",
        "bowled",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtrasRow {
    pub match_id: Option<String>,
    pub inning_name: Option<String>,
    pub extra_runs: i64,
    pub byes: i64,
}

impl TableRow for ExtrasRow {
    const HEADERS: &'static [&'static str] = &["match_id", "inning_name", "extra_runs", "byes"];
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlattenedTables {
    pub matches: Vec<MatchRow>,
    pub innings: Vec<InningsRow>,
    pub batting: Vec<BattingRow>,
    pub bowling: Vec<BowlingRow>,
    pub fielding: Vec<FieldingRow>,
    pub extras: Vec<ExtrasRow>,
}

impl FlattenedTables {
    pub fn len(&self, table: Table) -> usize {
        match table {
            Table::Matches => self.matches.len(),
            Table::Innings => self.innings.len(),
            Table::Batting => self.batting.len(),
            Table::Bowling => self.bowling.len(),
            Table::Fielding => self.fielding.len(),
            Table::Extras => self.extras.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        Table::ALL.iter().all(|t| self.len(*t) == 0)
    }
}

/// Flattens scorecards in input order. Never fails: absent or oddly shaped
/// sections simply produce no rows (or null cells).
pub fn flatten(records: &[Value]) -> FlattenedTables {
    let mut out = FlattenedTables::default();
    for record in records {
        flatten_record(record, &mut out);
    }
    out
}

pub fn flatten_record(record: &Value, out: &mut FlattenedTables) {
    let m = Field::of(record);
    let match_id = m.get("id").string();
    let teams = m.get("teams");

    out.matches.push(MatchRow {
        match_id: match_id.clone(),
        series_id: m.get("series_id").string(),
        match_name: m.get("name").string(),
        match_type: m.get("matchType").string(),
        status: m.get("status").string(),
        venue: m.get("venue").string(),
        date: m.get("date").string(),
        team1: teams.at(0).string(),
        team2: teams.at(1).string(),
        toss_winner: m.get("tossWinner").string(),
        toss_choice: m.get("tossChoice").string(),
        match_winner: m.get("matchWinner").string(),
    });

    for score in m.get("score").items() {
        let s = Field::of(score);
        out.innings.push(InningsRow {
            match_id: match_id.clone(),
            inning_name: s.get("inning").string(),
            runs: s.get("r").int(),
            wickets: s.get("w").int(),
            overs: s.get("o").float(),
        });
    }

    for innings in m.get("scorecard").items() {
        let inn = Field::of(innings);
        let inning_name = inn.get("inning").string();

        for batter in inn.get("batting").items() {
            let b = Field::of(batter);
            let batsman = b.get("batsman");
            let bowler = b.get("bowler");
            let catcher = b.get("catcher");
            out.batting.push(BattingRow {
                match_id: match_id.clone(),
                inning_name: inning_name.clone(),
                batsman_id: batsman.get("id").string(),
                batsman_name: batsman.get("name").string(),
                runs: b.get("r").int(),
                balls: b.get("b").int(),
                fours: b.get("4s").int(),
                sixes: b.get("6s").int(),
                strike_rate: b.get("sr").float(),
                dismissal: b.get("dismissal").string(),
                dismissal_text: b.get("dismissal-text").string(),
                bowler_id: bowler.get("id").string(),
                bowler_name: bowler.get("name").string(),
                catcher_id: catcher.get("id").string(),
                catcher_name: catcher.get("name").string(),
            });
        }

        for bowler in inn.get("bowling").items() {
            let b = Field::of(bowler);
            let info = b.get("bowler");
            out.bowling.push(BowlingRow {
                match_id: match_id.clone(),
                inning_name: inning_name.clone(),
                bowler_id: info.get("id").string(),
                bowler_name: info.get("name").string(),
                overs: b.get("o").float(),
                maidens: b.get("m").int(),
                runs_conceded: b.get("r").int(),
                wickets: b.get("w").int(),
                no_balls: b.get("nb").int(),
                wides: b.get("wd").int(),
                economy: b.get("eco").float(),
            });
        }

        for fielder in inn.get("catching").items() {
            let f = Field::of(fielder);
            let info = f.get("catcher");
            out.fielding.push(FieldingRow {
                match_id: match_id.clone(),
                inning_name: inning_name.clone(),
                fielder_id: info.get("id").string(),
                fielder_name: info.get("name").string(),
                catches: f.get("catch").int(),
                stumpings: f.get("stumped").int(),
                runouts: f.get("runout").int(),
                bowled: f.get("bowled").int(),
            });
        }

        let extras = inn.get("extras");
        out.extras.push(ExtrasRow {
            match_id: match_id.clone(),
            inning_name,
            extra_runs: extras.get("r").int().unwrap_or(0),
            byes: extras.get("b").int().unwrap_or(0),
        });
    }
}
