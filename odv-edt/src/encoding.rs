use std::borrow::Cow;
use std::fs;
use std::path::Path;

use encoding_rs::{Encoding, UTF_16LE, UTF_8};
use tracing::debug;

use crate::error::Error;

/// Candidates in order of preference. EDT writes UTF-16, but a UTF-8 copy is
/// friendlier to grep and less, so both are accepted.
fn preference() -> [&'static Encoding; 2] {
  [UTF_8, UTF_16LE]
}

/// A whole input file, decoded with the first encoding that fits it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoded {
  pub encoding: &'static Encoding,
  pub text: String,
}

/// Reads the file once and decodes it with the first encoding able to
/// decode all of it. A leading BOM is dropped.
pub fn read_detected(path: &Path) -> Result<Decoded, Error> {
  let bytes = fs::read(path).map_err(|err| Error::io(path, err))?;

  match detect_and_decode(&bytes) {
    Some((encoding, text)) => {
      debug!("Detected {} for '{}'", encoding.name(), path.display());
      Ok(Decoded {
        encoding,
        text: text.into_owned(),
      })
    }
    None => Err(Error::Encoding {
      path: path.to_path_buf(),
    }),
  }
}

pub fn detect(bytes: &[u8]) -> Option<&'static Encoding> {
  detect_and_decode(bytes).map(|(encoding, _)| encoding)
}

fn detect_and_decode(bytes: &[u8]) -> Option<(&'static Encoding, Cow<'_, str>)> {
  preference().into_iter().find_map(|candidate| {
    let (encoding, body) = with_bom(bytes, candidate);
    encoding
      .decode_without_bom_handling_and_without_replacement(body)
      .map(|text| (encoding, text))
  })
}

/// A BOM only counts when it belongs to the candidate's family: an UTF-16 BOM
/// may switch little to big endian, but never turns UTF-8 into UTF-16.
fn with_bom<'a>(bytes: &'a [u8], candidate: &'static Encoding) -> (&'static Encoding, &'a [u8]) {
  match Encoding::for_bom(bytes) {
    Some((found, len)) if (found == UTF_8) == (candidate == UTF_8) => (found, &bytes[len..]),
    _ => (candidate, bytes),
  }
}
