use once_cell::sync::Lazy;
use regex::Regex;
use time::Weekday;
use time::Weekday::{Friday, Monday, Saturday, Thursday, Tuesday, Wednesday};

use crate::error::Error;

static START_TIME_REGEX: Lazy<Regex> =
  Lazy::new(|| Regex::new("^(\\d{2})h(\\d{2})$").expect("valid start time regex"));

/// School days as the export spells them.
pub const DAYS: [(&str, Weekday); 6] = [
  ("lunedì", Monday),
  ("martedì", Tuesday),
  ("mercoledì", Wednesday),
  ("giovedì", Thursday),
  ("venerdì", Friday),
  ("sabato", Saturday),
];

pub const DEFAULT_START_TIMES: [&str; 8] = [
  "07h50", "08h40", "09h30", "10h30", "11h20", "12h15", "13h10", "14h00",
];

/// Index tables between the export's day names and start times and the
/// `(day_index, slot_index)` coordinates of a weekly grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schedule {
  start_times: Vec<String>,
}

impl Default for Schedule {
  fn default() -> Self {
    Self {
      start_times: DEFAULT_START_TIMES.iter().map(|s| s.to_string()).collect(),
    }
  }
}

impl Schedule {
  pub fn new<S: AsRef<str>>(start_times: &[S]) -> Result<Self, Error> {
    if start_times.is_empty() {
      return Err(Error::Schedule("no start times".to_string()));
    }

    let mut checked: Vec<String> = Vec::with_capacity(start_times.len());
    for start in start_times {
      let start = start.as_ref().trim();
      if !START_TIME_REGEX.is_match(start) {
        return Err(Error::Schedule(format!("'{start}' is not HHhMM")));
      }
      if checked.iter().any(|known| known == start) {
        return Err(Error::Schedule(format!("'{start}' is listed twice")));
      }
      checked.push(start.to_string());
    }

    Ok(Self {
      start_times: checked,
    })
  }

  pub fn days(&self) -> usize {
    DAYS.len()
  }

  pub fn slots(&self) -> usize {
    self.start_times.len()
  }

  pub fn day_index(&self, name: &str) -> Option<usize> {
    let name = name.trim().to_lowercase();
    DAYS
      .iter()
      .find(|(day, _)| *day == name)
      .map(|(_, weekday)| weekday.number_days_from_monday() as usize)
  }

  pub fn day_name(&self, index: usize) -> Option<&'static str> {
    DAYS.get(index).map(|(name, _)| *name)
  }

  /// `"lunedì"` -> `"Lun"`
  pub fn day_abbreviation(&self, index: usize) -> Option<String> {
    self
      .day_name(index)
      .map(|name| capitalize(&name.chars().take(3).collect::<String>()))
  }

  /// `"lunedì"` -> `"Lunedì"`
  pub fn day_title(&self, index: usize) -> Option<String> {
    self.day_name(index).map(capitalize)
  }

  pub fn slot_index(&self, start_time: &str) -> Option<usize> {
    let start_time = start_time.trim();
    self.start_times.iter().position(|start| start == start_time)
  }

  pub fn start_time(&self, slot: usize) -> Option<&str> {
    self.start_times.get(slot).map(String::as_str)
  }

  /// `"07h50"` -> `"07:50"`
  pub fn slot_label(&self, slot: usize) -> Option<String> {
    self.start_time(slot).map(|start| start.replace('h', ":"))
  }

  /// `"07h50"` -> `"7:50"`, as printed on the big board.
  pub fn short_slot_label(&self, slot: usize) -> Option<String> {
    self.slot_label(slot).map(|label| match label.strip_prefix('0') {
      Some(rest) => rest.to_string(),
      None => label,
    })
  }
}

fn capitalize(value: &str) -> String {
  let mut chars = value.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

#[cfg(test)]
mod test {
  use super::{Schedule, DAYS};

  #[test]
  fn days_round_trip() {
    let schedule = Schedule::default();
    for (index, (name, _)) in DAYS.iter().enumerate() {
      assert_eq!(schedule.day_index(name), Some(index));
      assert_eq!(schedule.day_name(index), Some(*name));
    }
    assert_eq!(schedule.day_index("domenica"), None);
    assert_eq!(schedule.day_index(" Martedì "), Some(1));
    assert_eq!(schedule.day_index("sabato"), Some(5));
  }

  #[test]
  fn slots_round_trip() {
    let schedule = Schedule::default();
    assert_eq!(schedule.slots(), 8);
    for slot in 0..schedule.slots() {
      let start = schedule.start_time(slot).unwrap().to_string();
      assert_eq!(schedule.slot_index(&start), Some(slot));
    }
    assert_eq!(schedule.slot_index("08h40"), Some(1));
    assert_eq!(schedule.slot_index("08h45"), None);
    assert_eq!(schedule.start_time(8), None);
  }

  #[test]
  fn labels() {
    let schedule = Schedule::default();
    assert_eq!(schedule.slot_label(0).as_deref(), Some("07:50"));
    assert_eq!(schedule.short_slot_label(0).as_deref(), Some("7:50"));
    assert_eq!(schedule.short_slot_label(3).as_deref(), Some("10:30"));
    assert_eq!(schedule.day_abbreviation(2).as_deref(), Some("Mer"));
    assert_eq!(schedule.day_title(3).as_deref(), Some("Giovedì"));
  }

  #[test]
  fn seven_slot_version() {
    let schedule = Schedule::new(&[
      "08h00", "08h50", "09h40", "10h40", "11h30", "12h20", "13h10",
    ])
    .unwrap();
    assert_eq!(schedule.slots(), 7);
    assert_eq!(schedule.slot_index("13h10"), Some(6));
  }

  #[test]
  fn rejects_bad_start_times() {
    assert!(Schedule::new::<&str>(&[]).is_err());
    assert!(Schedule::new(&["7:50"]).is_err());
    assert!(Schedule::new(&["07h50", "07h50"]).is_err());
  }
}
