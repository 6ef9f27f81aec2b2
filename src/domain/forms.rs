//! Settings Form Parsing
//!
//! Text formats accepted by the tracker settings form.

use super::entity::{DomainError, DomainResult};
use super::record::NamedEntry;
use super::tracker::{CheckItem, SetTemplate};

/// Split a comma-separated list, dropping blanks
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `name:detail` pairs separated by commas; the detail is optional
pub fn parse_named_entries(raw: &str) -> Vec<NamedEntry> {
    parse_list(raw)
        .into_iter()
        .map(|item| match item.split_once(':') {
            Some((name, detail)) => NamedEntry::new(name.trim(), detail.trim()),
            None => NamedEntry::new(item, ""),
        })
        .collect()
}

/// Checklist template from `name:detail` pairs
pub fn parse_check_items(raw: &str) -> Vec<CheckItem> {
    parse_named_entries(raw)
        .into_iter()
        .map(|entry| CheckItem::new(entry.name, entry.detail))
        .collect()
}

/// Parse exercise groups, one per line, as `name|sets|reps1,reps2,...`.
///
/// A single rep value is repeated for every set; otherwise the rep count
/// must match the set count.
pub fn parse_set_lines(raw: &str) -> DomainResult<Vec<SetTemplate>> {
    let mut groups = Vec::new();
    for (line_no, line) in raw.lines().enumerate().filter(|(_, l)| !l.trim().is_empty()) {
        let invalid = |why: &str| DomainError::InvalidInput(format!("line {}: {}", line_no + 1, why));

        let parts: Vec<&str> = line.split('|').map(str::trim).collect();
        let [name, sets, reps] = parts[..] else {
            return Err(invalid("expected name|sets|reps"));
        };
        if name.is_empty() {
            return Err(invalid("exercise name is empty"));
        }
        let sets: usize = sets.parse().map_err(|_| invalid("sets must be a whole number"))?;
        if sets == 0 {
            return Err(invalid("at least one set is needed"));
        }
        let mut reps = reps
            .split(',')
            .map(|r| r.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid("reps must be whole numbers"))?;
        if reps.len() == 1 && sets > 1 {
            reps = vec![reps[0]; sets];
        }
        if reps.len() != sets {
            return Err(invalid(&format!("{} sets but {} rep targets", sets, reps.len())));
        }
        groups.push(SetTemplate {
            name: name.to_string(),
            reps,
        });
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list(" cake, candy ,, "), vec!["cake", "candy"]);
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn test_parse_check_items() {
        let items = parse_check_items("D3: 1 pill, Omega");
        assert_eq!(items, vec![CheckItem::new("D3", "1 pill"), CheckItem::new("Omega", "")]);
    }

    #[test]
    fn test_parse_set_lines() {
        let groups = parse_set_lines("Push-ups|3|15,12,10\n\nSquats | 2 | 20").unwrap();
        assert_eq!(
            groups,
            vec![
                SetTemplate { name: "Push-ups".into(), reps: vec![15, 12, 10] },
                SetTemplate { name: "Squats".into(), reps: vec![20, 20] },
            ]
        );
    }

    #[test]
    fn test_parse_set_lines_errors() {
        assert_eq!(
            parse_set_lines("Push-ups|x|10").unwrap_err(),
            DomainError::InvalidInput("line 1: sets must be a whole number".into())
        );
        assert!(parse_set_lines("Push-ups|2|10,abc").is_err());
        assert!(parse_set_lines("Push-ups|3|10,8").is_err());
        assert!(parse_set_lines("ok|1|1\nPush-ups").is_err());
    }
}
