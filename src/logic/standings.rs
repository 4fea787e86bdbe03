//! Standings table aggregated from match history.

use crate::logic::view::NameResolver;
use crate::models::{EngineError, EntrantId, Outcome, Sport};
use crate::store::{BracketStore, EntrantDirectory};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Write;

/// One entrant's line in the standings.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub entrant_id: EntrantId,
    pub name: String,
    pub cycle: Option<String>,
    pub played: u32,
    pub wins: u32,
    pub losses: u32,
    pub points: i32,
}

/// Standings for `sport`, ordered by points, then wins, then name.
pub fn standings<S>(store: &S, sport: &Sport) -> Result<Vec<StandingRow>, EngineError>
where
    S: BracketStore + EntrantDirectory,
{
    let mut totals: HashMap<EntrantId, (u32, u32, i32)> = HashMap::new();
    for record in store.history(sport.kind, sport.id)? {
        let t = totals.entry(record.entrant_id).or_default();
        match record.outcome {
            Outcome::Won => t.0 += 1,
            Outcome::Lost => t.1 += 1,
        }
        t.2 += record.points;
    }

    let mut resolver = NameResolver::new(store, sport);
    let mut rows = Vec::with_capacity(totals.len());
    for (entrant_id, (wins, losses, points)) in totals {
        let view = resolver.resolve(entrant_id)?;
        rows.push(StandingRow {
            entrant_id,
            name: view.name,
            cycle: view.cycle,
            played: wins + losses,
            wins,
            losses,
            points,
        });
    }
    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.wins.cmp(&a.wins))
            .then_with(|| a.name.cmp(&b.name))
    });
    Ok(rows)
}

/// Write standings as CSV with a header row.
pub fn write_standings_csv<W: Write>(rows: &[StandingRow], out: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(out);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_has_header_and_one_line_per_row() {
        let rows = vec![StandingRow {
            entrant_id: 3,
            name: "Sistemas A".into(),
            cycle: Some("V".into()),
            played: 2,
            wins: 1,
            losses: 1,
            points: 30,
        }];
        let mut buf = Vec::new();
        write_standings_csv(&rows, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "entrant_id,name,cycle,played,wins,losses,points");
        assert_eq!(lines[1], "3,Sistemas A,V,2,1,1,30");
    }
}
