//! In-memory storage implementation for testing

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::traits::*;
use crate::types::*;

type AccountTable = Option<HashMap<String, Account>>;

/// In-memory storage implementation for testing and development
///
/// Clones share the same underlying tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    accounts: Arc<RwLock<AccountTable>>,
    state: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts, zero before the schema exists
    pub fn account_count(&self) -> LedgerResult<usize> {
        Ok(self.read_accounts()?.as_ref().map_or(0, HashMap::len))
    }

    fn read_accounts(&self) -> LedgerResult<RwLockReadGuard<'_, AccountTable>> {
        self.accounts
            .read()
            .map_err(|_| LedgerError::Storage("account table lock poisoned".to_string()))
    }

    fn write_accounts(&self) -> LedgerResult<RwLockWriteGuard<'_, AccountTable>> {
        self.accounts
            .write()
            .map_err(|_| LedgerError::Storage("account table lock poisoned".to_string()))
    }
}

fn table(accounts: &AccountTable) -> LedgerResult<&HashMap<String, Account>> {
    accounts
        .as_ref()
        .ok_or_else(|| LedgerError::Storage("account table has not been created".to_string()))
}

fn table_mut(accounts: &mut AccountTable) -> LedgerResult<&mut HashMap<String, Account>> {
    accounts
        .as_mut()
        .ok_or_else(|| LedgerError::Storage("account table has not been created".to_string()))
}

#[async_trait]
impl AccountStore for MemoryStorage {
    async fn create_schema(&self) -> LedgerResult<()> {
        let mut accounts = self.write_accounts()?;
        if accounts.is_some() {
            return Err(LedgerError::AlreadyInitialized);
        }
        *accounts = Some(HashMap::new());
        Ok(())
    }

    async fn drop_schema(&self) -> LedgerResult<()> {
        *self.write_accounts()? = None;
        Ok(())
    }

    async fn insert(&self, account_id: &str, balance: i64) -> LedgerResult<Account> {
        let mut accounts = self.write_accounts()?;
        let table = table_mut(&mut accounts)?;
        if table.contains_key(account_id) {
            return Err(LedgerError::AlreadyExists(account_id.to_string()));
        }
        let account = Account::new(account_id.to_string(), balance);
        table.insert(account.id.clone(), account.clone());
        Ok(account)
    }

    async fn get(&self, account_id: &str) -> LedgerResult<Account> {
        let accounts = self.read_accounts()?;
        table(&accounts)?
            .get(account_id)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(account_id.to_string()))
    }

    async fn replace(&self, account_id: &str, balance: i64) -> LedgerResult<Account> {
        let mut accounts = self.write_accounts()?;
        let account = table_mut(&mut accounts)?
            .get_mut(account_id)
            .ok_or_else(|| LedgerError::NotFound(account_id.to_string()))?;
        account.set_balance(balance);
        Ok(account.clone())
    }

    async fn commit(&self, updates: &[BalanceUpdate]) -> LedgerResult<()> {
        let mut accounts = self.write_accounts()?;
        let table = table_mut(&mut accounts)?;

        // Validate the whole batch before touching any record
        let mut seen = HashSet::new();
        for update in updates {
            if !seen.insert(update.account_id.as_str()) {
                return Err(LedgerError::InvalidArgument(format!(
                    "account '{}' appears more than once in a commit",
                    update.account_id
                )));
            }
            let current = table
                .get(&update.account_id)
                .ok_or_else(|| LedgerError::NotFound(update.account_id.clone()))?;
            if current.version != update.expected_version {
                return Err(LedgerError::Conflict {
                    account_id: update.account_id.clone(),
                    expected: update.expected_version,
                    found: current.version,
                });
            }
        }

        for update in updates {
            if let Some(account) = table.get_mut(&update.account_id) {
                account.set_balance(update.new_balance);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl StateStore for MemoryStorage {
    async fn get_state(&self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        let state = self
            .state
            .read()
            .map_err(|_| LedgerError::Storage("state lock poisoned".to_string()))?;
        Ok(state.get(key).cloned())
    }

    async fn put_state(&self, key: &str, value: &[u8]) -> LedgerResult<()> {
        self.state
            .write()
            .map_err(|_| LedgerError::Storage("state lock poisoned".to_string()))?
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
