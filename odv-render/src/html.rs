use sailfish::TemplateOnce;

use odv_edt::grid::Grid;
use odv_edt::schedule::Schedule;

use crate::{file_stem, Error};

#[derive(TemplateOnce)]
#[template(path = "class.stpl")]
struct ClassPage {
  title: String,
  columns: usize,
  days: Vec<String>,
  rows: Vec<PageRow>,
}

struct PageRow {
  label: String,
  /// `(subject, teacher)`, `None` renders as a blank cell.
  cells: Vec<Option<(String, String)>>,
}

/// Weekly table of one class: a column per day, a row per start time.
pub fn render_class_page(grid: &Grid, schedule: &Schedule) -> Result<String, Error> {
  let days = (0..grid.days())
    .map(|day| schedule.day_abbreviation(day).unwrap_or_default())
    .collect::<Vec<_>>();

  let rows = (0..grid.slots())
    .map(|slot| PageRow {
      label: schedule.slot_label(slot).unwrap_or_default(),
      cells: grid
        .slot_row(slot)
        .into_iter()
        .map(|cell| {
          if cell.is_empty() {
            None
          } else {
            Some((cell.subject_codes(), cell.teacher_surnames()))
          }
        })
        .collect(),
    })
    .collect();

  let page = ClassPage {
    title: grid.owner().to_string(),
    columns: days.len() + 1,
    days,
    rows,
  };

  Ok(page.render_once()?)
}

pub fn page_file_name(grid: &Grid) -> String {
  format!("{}.html", file_stem(&grid.owner().to_string()))
}

#[cfg(test)]
mod test {
  use odv_edt::grid::{Grid, Owner};
  use odv_edt::lesson::{Lesson, Room, Teacher};
  use odv_edt::schedule::Schedule;

  use super::{page_file_name, render_class_page};

  fn lesson(subject: &str, teacher: &str, day: usize, slot: usize) -> Lesson {
    Lesson {
      line: 2,
      subject_code: subject.to_string(),
      subject_name: subject.to_string(),
      teacher: Teacher::new(teacher, "Luca"),
      class_code: "2P".to_string(),
      shared: false,
      room: Room::new("Lab. Inf..1 (2.04)"),
      day,
      slot,
    }
  }

  #[test]
  fn class_page() -> anyhow::Result<()> {
    let schedule = Schedule::default();
    let lessons = vec![
      lesson("INF", "Manini", 1, 0),
      lesson("INF", "Manini", 1, 1),
      lesson("SCI", "Rossi", 4, 7),
      lesson("FIS", "Verdi", 4, 7),
    ];
    let grid = Grid::build(Owner::Class("2P".to_string()), &schedule, &lessons);

    let html = render_class_page(&grid, &schedule)?;

    assert!(html.contains("<title>2P</title>"));
    assert!(html.contains("colspan=\"7\""));
    for day in ["Lun", "Mar", "Mer", "Gio", "Ven", "Sab"] {
      assert!(html.contains(&format!("<th>{day}</th>")));
    }
    assert!(html.contains("<td>07:50</td>"));
    assert!(html.contains("<td>14:00</td>"));
    assert_eq!(html.matches("<tr>").count(), 2 + 8);
    assert_eq!(html.matches("INF<br>Manini").count(), 2);
    assert!(html.contains("SCI/FIS<br>Rossi/Verdi"));
    assert_eq!(html.matches("<td></td>").count(), 6 * 8 - 3);
    assert!(!html.contains("None"));
    Ok(())
  }

  #[test]
  fn text_is_escaped() -> anyhow::Result<()> {
    let schedule = Schedule::default();
    let lessons = vec![lesson("A&B", "O<Neil", 0, 0)];
    let grid = Grid::build(Owner::Class("2P".to_string()), &schedule, &lessons);

    let html = render_class_page(&grid, &schedule)?;
    assert!(html.contains("A&amp;B<br>O&lt;Neil"));
    Ok(())
  }

  #[test]
  fn file_names() {
    let schedule = Schedule::default();
    let grid = Grid::new(Owner::Class("2G/H SPA".to_string()), &schedule);
    assert_eq!(page_file_name(&grid), "2G-H_SPA.html");
  }
}
