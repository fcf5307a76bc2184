use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use crate::lesson::{Lesson, Teacher};

/// Groups lessons by any key. Lessons keep their input order inside a group.
pub fn group_by<'a, K, F>(lessons: &'a [Lesson], key: F) -> BTreeMap<K, Vec<&'a Lesson>>
where
  K: Ord,
  F: Fn(&Lesson) -> K,
{
  let mut groups: BTreeMap<K, Vec<&Lesson>> = BTreeMap::new();
  for lesson in lessons {
    groups.entry(key(lesson)).or_default().push(lesson);
  }
  groups
}

/// Collects a set of values per key.
pub fn collect_sets<K, F>(lessons: &[Lesson], pair: F) -> BTreeMap<K, BTreeSet<String>>
where
  K: Ord,
  F: Fn(&Lesson) -> (K, String),
{
  let mut sets: BTreeMap<K, BTreeSet<String>> = BTreeMap::new();
  for lesson in lessons {
    let (key, value) = pair(lesson);
    sets.entry(key).or_default().insert(value);
  }
  sets
}

/// Subject code to display name. The first name seen for a code wins, a
/// different one later on is reported.
pub fn subject_names(lessons: &[Lesson]) -> BTreeMap<String, String> {
  let mut names = BTreeMap::new();

  for lesson in lessons {
    match names.entry(lesson.subject_code.clone()) {
      Entry::Vacant(entry) => {
        entry.insert(lesson.subject_name.clone());
      }
      Entry::Occupied(entry) => {
        if *entry.get() != lesson.subject_name {
          warn!(
            line = lesson.line,
            "Subject {} is named both '{}' and '{}', keeping the first",
            lesson.subject_code,
            entry.get(),
            lesson.subject_name
          );
        }
      }
    }
  }

  names
}

/// Subject codes per class. Codes from shared sections are lowercased, so
/// `2G = ... spa ted` tells them apart from the class's own lessons.
pub fn class_subjects(lessons: &[Lesson]) -> BTreeMap<String, BTreeSet<String>> {
  collect_sets(lessons, |lesson| {
    let code = if lesson.shared {
      lesson.subject_code.to_lowercase()
    } else {
      lesson.subject_code.clone()
    };
    (lesson.class_code.clone(), code)
  })
}

pub fn teacher_subjects(lessons: &[Lesson]) -> BTreeMap<Teacher, BTreeSet<String>> {
  collect_sets(lessons, |lesson| {
    (lesson.teacher.clone(), lesson.subject_code.clone())
  })
}

pub fn teacher_classes(lessons: &[Lesson]) -> BTreeMap<Teacher, BTreeSet<String>> {
  collect_sets(lessons, |lesson| {
    (lesson.teacher.clone(), lesson.class_code.clone())
  })
}

/// Class council view: who teaches what in each class.
pub fn class_teachers(lessons: &[Lesson]) -> BTreeMap<String, BTreeSet<(Teacher, String)>> {
  let mut councils: BTreeMap<String, BTreeSet<(Teacher, String)>> = BTreeMap::new();
  for lesson in lessons {
    councils
      .entry(lesson.class_code.clone())
      .or_default()
      .insert((lesson.teacher.clone(), lesson.subject_code.clone()));
  }
  councils
}

/// Classes with at least one hour in a room, keyed by the room's short token.
pub fn room_classes(lessons: &[Lesson]) -> BTreeMap<String, BTreeSet<String>> {
  collect_sets(lessons, |lesson| {
    (lesson.room.token().to_string(), lesson.class_code.clone())
  })
}

/// Class, then day index, then the day's lessons ordered by slot.
pub fn class_days(lessons: &[Lesson]) -> BTreeMap<String, BTreeMap<usize, Vec<&Lesson>>> {
  group_by(lessons, |lesson| lesson.class_code.clone())
    .into_iter()
    .map(|(class_code, lessons)| {
      let mut days: BTreeMap<usize, Vec<&Lesson>> = BTreeMap::new();
      for lesson in lessons {
        days.entry(lesson.day).or_default().push(lesson);
      }
      for day in days.values_mut() {
        day.sort_by_key(|lesson| lesson.slot);
      }
      (class_code, days)
    })
    .collect()
}
