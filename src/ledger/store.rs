//! Key-value persistence for the [`FinancialData`] document.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ImportError, ImportResult};
use crate::types::Sale;

use super::model::{FinancialData, UserProfile, VariableExpense};

/// Key the document is stored under.
pub const FINANCIAL_DATA_KEY: &str = "financial-data";

/// String key-value storage, e.g. a browser's local storage or a directory of files.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> ImportResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> ImportResult<()>;
    /// Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> ImportResult<()>;
}

/// In-process store, lost on drop.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> ImportResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> ImportResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> ImportResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One `{key}.json` file per key inside a directory. The directory is created on first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> ImportResult<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(ImportError::Store {
                message: format!("invalid store key '{key}'"),
            });
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> ImportResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> ImportResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(path, value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> ImportResult<()> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Load-modify-save access to the [`FinancialData`] document.
///
/// Every mutation rewrites the whole document.
#[derive(Debug, Clone, Default)]
pub struct FinancialStore<S> {
    store: S,
}

impl<S: KeyValueStore> FinancialStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// The stored document, or an empty one when nothing was saved yet.
    pub fn load(&self) -> ImportResult<FinancialData> {
        match self.store.get(FINANCIAL_DATA_KEY)? {
            Some(text) => Ok(serde_json::from_str(&text)?),
            None => Ok(FinancialData::default()),
        }
    }

    pub fn save(&mut self, data: &FinancialData) -> ImportResult<()> {
        let text = serde_json::to_string(data)?;
        self.store.set(FINANCIAL_DATA_KEY, &text)
    }

    pub fn clear(&mut self) -> ImportResult<()> {
        self.store.remove(FINANCIAL_DATA_KEY)
    }

    /// Append imported sales after the existing ones and save. Returns the saved document.
    pub fn append_sales(&mut self, sales: Vec<Sale>) -> ImportResult<FinancialData> {
        let mut data = self.load()?;
        debug!(existing = data.sales.len(), added = sales.len(), "appending sales");
        data.sales.extend(sales);
        self.save(&data)?;
        Ok(data)
    }

    /// Remove the sale with `id`. Returns `false` (and saves nothing) when no sale matched.
    pub fn delete_sale(&mut self, id: &str) -> ImportResult<bool> {
        let mut data = self.load()?;
        let before = data.sales.len();
        data.sales.retain(|s| s.id != id);
        if data.sales.len() == before {
            return Ok(false);
        }
        self.save(&data)?;
        Ok(true)
    }

    pub fn add_expense(&mut self, expense: VariableExpense) -> ImportResult<FinancialData> {
        let mut data = self.load()?;
        data.variable_expenses.push(expense);
        self.save(&data)?;
        Ok(data)
    }

    /// Remove the expense with `id`. Returns `false` when no expense matched.
    pub fn delete_expense(&mut self, id: &str) -> ImportResult<bool> {
        let mut data = self.load()?;
        let before = data.variable_expenses.len();
        data.variable_expenses.retain(|e| e.id != id);
        if data.variable_expenses.len() == before {
            return Ok(false);
        }
        self.save(&data)?;
        Ok(true)
    }

    pub fn update_profile(&mut self, profile: UserProfile) -> ImportResult<FinancialData> {
        let mut data = self.load()?;
        data.user_profile = profile;
        self.save(&data)?;
        Ok(data)
    }

    /// Pretty-printed JSON of the stored document, for backups.
    pub fn export_json(&self) -> ImportResult<String> {
        Ok(serde_json::to_string_pretty(&self.load()?)?)
    }
}
