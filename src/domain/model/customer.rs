use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub phone_digits: String,
    pub alt_phone_digits: String,
    pub street: String,
    pub house_number: String,
    pub postcode: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    phone: String,
    #[serde(default)]
    mobile: String,
    #[serde(default)]
    postcode: String,
    #[serde(default)]
    street1: String,
    #[serde(default)]
    house_number: String,
    #[serde(default)]
    fname: String,
    #[serde(default)]
    iname: String,
}

fn only_digits(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

/// Lazily-loaded phone -> address index (CD). Reloads the CSV only when
/// its mtime advances, mirroring the teacher's mutex-guarded swap-on-change
/// cache for fetched menus (`domain/fetch/cache.rs`), generalised here from
/// an LRU of fetch results to a full-table reload.
pub struct CustomerDirectory {
    path: PathBuf,
    inner: Mutex<Inner>,
}

struct Inner {
    loaded_at: Option<SystemTime>,
    by_phone: HashMap<String, CustomerRecord>,
}

impl CustomerDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            inner: Mutex::new(Inner {
                loaded_at: None,
                by_phone: HashMap::new(),
            }),
        }
    }

    fn mtime(&self) -> Option<SystemTime> {
        std::fs::metadata(&self.path).ok()?.modified().ok()
    }

    fn reload_if_changed(&self, guard: &mut Inner) {
        let current_mtime = self.mtime();
        if current_mtime.is_some() && current_mtime == guard.loaded_at {
            return;
        }

        match Self::load_csv(&self.path) {
            Ok(records) => {
                guard.by_phone = records;
                guard.loaded_at = current_mtime;
            }
            Err(err) => {
                tracing::warn!(path = ?self.path, %err, "customer directory reload failed, keeping previous index");
            }
        }
    }

    fn load_csv(path: &Path) -> anyhow::Result<HashMap<String, CustomerRecord>> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut out = HashMap::new();
        for row in reader.deserialize::<CsvRow>() {
            let row = row?;
            let phone = only_digits(&row.phone);
            let mobile = only_digits(&row.mobile);
            let record = CustomerRecord {
                phone_digits: phone.clone(),
                alt_phone_digits: mobile.clone(),
                street: row.street1,
                house_number: row.house_number,
                postcode: row.postcode,
                name: format!("{} {}", row.fname, row.iname).trim().to_string(),
            };
            if !phone.is_empty() {
                out.insert(phone, record.clone());
            }
            if !mobile.is_empty() {
                out.insert(mobile, record);
            }
        }
        Ok(out)
    }

    /// Exact match on either phone column; on miss, retry with the last 8
    /// digits of the query.
    pub fn lookup(&self, queried_phone: &str) -> Option<CustomerRecord> {
        let digits = only_digits(queried_phone);
        if digits.is_empty() {
            return None;
        }

        let mut guard = self.inner.lock().ok()?;
        self.reload_if_changed(&mut guard);

        if let Some(hit) = guard.by_phone.get(&digits) {
            return Some(hit.clone());
        }

        if digits.len() > 8 {
            let suffix = &digits[digits.len() - 8..];
            if let Some(hit) = guard.by_phone.get(suffix) {
                return Some(hit.clone());
            }
        }

        None
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    #[test]
    fn looks_up_by_exact_and_suffix_match() {
        let path = std::env::temp_dir().join(format!(
            "belassistent-test-customers-{}-{}.csv",
            std::process::id(),
            line!()
        ));
        {
            let mut file = std::fs::File::create(&path).unwrap();
            writeln!(file, "phone,mobile,postcode,street1,house_number,fname,iname").unwrap();
            writeln!(file, "0201234567,0612345678,1234AB,Kerkstraat,5,Jan,Jansen").unwrap();
        }

        let dir = CustomerDirectory::new(path.clone());
        let found = dir.lookup("0612345678").unwrap();
        assert_eq!(found.street, "Kerkstraat");

        let found_by_suffix = dir.lookup("31612345678").unwrap();
        assert_eq!(found_by_suffix.house_number, "5");

        assert!(dir.lookup("0600000000").is_none());

        std::fs::remove_file(&path).ok();
    }
}
