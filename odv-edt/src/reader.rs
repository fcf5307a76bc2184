use std::io::Cursor;

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};

use crate::error::RowError;

/// Columns of the EDT export, in order.
pub const COLUMNS: usize = 16;

/// One data row of the export, fields named after the export header.
///
/// ```text
/// 344;2h00;S;INF;Informatica;Manini;Luca;2Psa;Lab. Inf..1 (2.04);S;ss;N;50/60;martedì;07h50;0
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawRow {
  pub line: u64,
  pub number: String,
  pub duration: String,
  pub frequency: String,
  pub subject_code: String,
  pub subject_name: String,
  pub teacher_surname: String,
  pub teacher_given_name: String,
  pub class: String,
  pub room: String,
  pub periodicity: String,
  pub specification: String,
  pub co_teaching: String,
  pub coefficient: String,
  pub day: String,
  pub start_time: String,
  pub students: String,
}

impl RawRow {
  pub fn from_record(line: u64, record: &StringRecord) -> Result<Self, RowError> {
    if record.len() < COLUMNS {
      return Err(RowError::Malformed {
        line,
        expected: COLUMNS,
        found: record.len(),
      });
    }

    let field = |index: usize| record.get(index).unwrap_or_default().to_string();

    Ok(Self {
      line,
      number: field(0),
      duration: field(1),
      frequency: field(2),
      subject_code: field(3),
      subject_name: field(4),
      teacher_surname: field(5),
      teacher_given_name: field(6),
      class: field(7),
      room: field(8),
      periodicity: field(9),
      specification: field(10),
      co_teaching: field(11),
      coefficient: field(12),
      day: field(13),
      start_time: field(14),
      students: field(15),
    })
  }
}

/// Single pass over the data rows of an export; the header row is skipped.
pub struct Rows {
  records: StringRecordsIntoIter<Cursor<Vec<u8>>>,
  read: u64,
}

impl Rows {
  pub fn from_text(text: impl Into<String>) -> Self {
    let reader = ReaderBuilder::new()
      .delimiter(b';')
      .has_headers(true)
      .flexible(true)
      .trim(Trim::All)
      .from_reader(Cursor::new(text.into().into_bytes()));

    Self {
      records: reader.into_records(),
      read: 0,
    }
  }
}

impl Iterator for Rows {
  type Item = Result<RawRow, RowError>;

  fn next(&mut self) -> Option<Self::Item> {
    let result = self.records.next()?;
    self.read += 1;

    // the header is line 1, so data row n sits on line n + 1 unless the
    // reader knows better
    let fallback = self.read + 1;

    Some(match result {
      Ok(record) => {
        let line = record
          .position()
          .map(|position| position.line())
          .unwrap_or(fallback);
        RawRow::from_record(line, &record)
      }
      Err(err) => Err(RowError::Unreadable {
        line: err
          .position()
          .map(|position| position.line())
          .unwrap_or(fallback),
        reason: err.to_string(),
      }),
    })
  }
}

#[cfg(test)]
mod test {
  use crate::error::RowError;

  use super::Rows;

  const HEADER: &str = "NUMERO;DURATA;FREQUENZA;MAT_COD;MAT_NOME;DOC_COGN;DOC_NOME;CLASSE;AULA;PERIODICITA;SPECIFICA;CO_DOC;COEFF;GIORNO;ORA_INIZIO;ALUNNI";

  #[test]
  fn header_is_dropped() {
    let text = format!(
      "{HEADER}\n344;2h00;S;INF;Informatica;Manini;Luca;2Psa;Lab. Inf..1 (2.04);S;ss;N;50/60;martedì;07h50;0\n"
    );
    let rows = Rows::from_text(text).collect::<Vec<_>>();

    assert_eq!(rows.len(), 1);
    let row = rows[0].clone().unwrap();
    assert_eq!(row.line, 2);
    assert_eq!(row.duration, "2h00");
    assert_eq!(row.class, "2Psa");
    assert_eq!(row.room, "Lab. Inf..1 (2.04)");
    assert_eq!(row.day, "martedì");
    assert_eq!(row.start_time, "07h50");
  }

  #[test]
  fn short_row_names_its_line() {
    let text = format!(
      "{HEADER}\n1;1h00;S;ITA;Italiano;Rossi;Anna;1As;Aula 1As (1.10);S;ss;N;50/60;lunedì;07h50;0\n2;1h00;S;ITA\n"
    );
    let rows = Rows::from_text(text).collect::<Vec<_>>();

    assert!(rows[0].is_ok());
    assert_eq!(
      rows[1],
      Err(RowError::Malformed {
        line: 3,
        expected: 16,
        found: 4
      })
    );
  }

  #[test]
  fn lines_follow_the_file() {
    let rows = Rows::from_text(format!("{HEADER}\n1\n2\n3\n"))
      .map(|row| row.map(|row| row.line).unwrap_or_else(|err| err.line()))
      .collect::<Vec<_>>();
    assert_eq!(rows, vec![2, 3, 4]);
  }
}
