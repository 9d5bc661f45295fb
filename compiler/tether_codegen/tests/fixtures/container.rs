// @generated by tether. Do not edit.
//
// Dispatch for 4 identifiers across 3 concretes.

#![allow(unused_imports, unused_variables, clippy::all)]

use tether_runtime::{Arg, Construct, Instance, ResolveError, SingletonCache};

use crate::app::App as App_1;
use crate::audit::Audit as Audit_1;
use crate::log::console::ConsoleLogger as ConsoleLogger_1;

#[derive(Default)]
pub struct Container {
    singletons: SingletonCache,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&mut self, id: &str) -> Result<Instance, ResolveError> {
        dispatch(&mut self.singletons, id)
    }
}

fn dispatch(singletons: &mut SingletonCache, id: &str) -> Result<Instance, ResolveError> {
    match id {
        "app_ots_SApp" => {
            let args = vec![
                Arg::Service(dispatch(singletons, "api_ots_SLogger")?),
                Arg::Null,
            ];
            Ok(App_1::construct(args))
        }
        "audit_ots_SAudit" => {
            let args = vec![
                Arg::All(vec![dispatch(singletons, "api_ots_SLogger")?, dispatch(singletons, "app_ots_SApp")?]),
            ];
            Ok(Audit_1::construct(args))
        }
        "api_ots_SLogger" | "log_dconsole_ots_SConsoleLogger" => singletons.get_or_try_insert_with::<ResolveError>("log_dconsole_ots_SConsoleLogger", |singletons| {
            let args = Vec::new();
            Ok(ConsoleLogger_1::construct(args))
        }),
        _ => Err(ResolveError::Unknown(id.to_string())),
    }
}
