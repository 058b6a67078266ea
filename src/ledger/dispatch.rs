//! Name-based entry points for hosts that route string-argument calls
//!
//! Mutating functions go through [`Ledger::invoke`], read-only ones through
//! [`Ledger::query`], and deployment through [`Ledger::init`]. Every function
//! returns raw bytes.

use tracing::{debug, warn};

use crate::ledger::Ledger;
use crate::traits::*;
use crate::types::*;
use crate::utils::validation::{expect_args, expect_min_args};

impl<S: AccountStore + StateStore + Clone> Ledger<S> {
    /// Deployment entry point; takes no arguments and records the deploying
    /// caller's credential as the administrator
    pub async fn init(
        &self,
        caller_credential: Option<&[u8]>,
        args: &[String],
    ) -> LedgerResult<Vec<u8>> {
        expect_args("init", args, 0)?;
        self.bootstrap(caller_credential).await?;
        Ok(Vec::new())
    }

    /// Run a mutating function: `assign` or `transfer`
    pub async fn invoke(
        &self,
        request: &RequestContext,
        function: &str,
        args: &[String],
    ) -> LedgerResult<Vec<u8>> {
        debug!(function, args = args.len(), "invoke");
        match function {
            "assign" => {
                expect_args(function, args, 1)?;
                self.assign(request, &args[0]).await?;
                Ok(Vec::new())
            }
            "transfer" => {
                expect_args(function, args, 3)?;
                self.transfer(request, &args[0], &args[1], &args[2]).await?;
                Ok(Vec::new())
            }
            _ => {
                warn!(function, "unknown invoke function");
                Err(LedgerError::InvalidArgument(format!(
                    "Received unknown function invocation '{}'",
                    function
                )))
            }
        }
    }

    /// Run a read-only function: `getBalance` or `read`
    pub async fn query(&self, function: &str, args: &[String]) -> LedgerResult<Vec<u8>> {
        debug!(function, args = args.len(), "query");
        match function {
            "getBalance" => {
                expect_min_args(function, args, 1)?;
                let balance = self.get_balance(&args[0]).await?;
                Ok(balance.to_string().into_bytes())
            }
            "read" => {
                expect_min_args(function, args, 1)?;
                self.read(&args[0]).await
            }
            _ => {
                warn!(function, "unknown query function");
                Err(LedgerError::InvalidArgument(format!(
                    "Received unknown function query invocation with function '{}'",
                    function
                )))
            }
        }
    }
}
