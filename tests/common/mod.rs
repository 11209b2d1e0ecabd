#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use sql_props_loader::{
    ConnectionConfig, DbConnection, Driver, ResultSet, RowValues, SqlPropsError,
};

/// What the scripted connection should do; shared with the test for inspection.
#[derive(Debug, Default)]
pub struct Script {
    pub initial_auto_commit: bool,
    pub failing: HashSet<String>,
    pub results: HashMap<String, ResultSet>,
    pub commit_fails: bool,
    pub rollback_fails: bool,
    pub close_fails: bool,
    pub init_fails: bool,
    pub events: Vec<String>,
    pub connects: usize,
    pub last_config: Option<ConnectionConfig>,
    pub auto_commit: bool,
}

#[derive(Clone, Default)]
pub struct ScriptedDriver {
    pub script: Arc<Mutex<Script>>,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        let script = Script {
            initial_auto_commit: true,
            ..Script::default()
        };
        Self {
            script: Arc::new(Mutex::new(script)),
        }
    }

    pub fn fail_on(self, sql: &str) -> Self {
        self.script.lock().unwrap().failing.insert(sql.to_string());
        self
    }

    pub fn returning(self, sql: &str, result: ResultSet) -> Self {
        self.script
            .lock()
            .unwrap()
            .results
            .insert(sql.to_string(), result);
        self
    }

    pub fn with_auto_commit(self, on: bool) -> Self {
        self.script.lock().unwrap().initial_auto_commit = on;
        self
    }

    pub fn failing_commit(self) -> Self {
        self.script.lock().unwrap().commit_fails = true;
        self
    }

    pub fn failing_rollback(self) -> Self {
        self.script.lock().unwrap().rollback_fails = true;
        self
    }

    pub fn failing_close(self) -> Self {
        self.script.lock().unwrap().close_fails = true;
        self
    }

    pub fn failing_initialize(self) -> Self {
        self.script.lock().unwrap().init_fails = true;
        self
    }

    pub fn events(&self) -> Vec<String> {
        self.script.lock().unwrap().events.clone()
    }

    pub fn connects(&self) -> usize {
        self.script.lock().unwrap().connects
    }

    pub fn auto_commit(&self) -> bool {
        self.script.lock().unwrap().auto_commit
    }

    pub fn connection(&self) -> ScriptedConnection {
        let mut script = self.script.lock().unwrap();
        script.auto_commit = script.initial_auto_commit;
        ScriptedConnection {
            script: Arc::clone(&self.script),
        }
    }
}

impl Driver for ScriptedDriver {
    fn name(&self) -> &str {
        "scripted"
    }

    fn initialize(&self) -> Result<(), SqlPropsError> {
        if self.script.lock().unwrap().init_fails {
            return Err(failure("initialize"));
        }
        Ok(())
    }

    fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn DbConnection>, SqlPropsError> {
        {
            let mut script = self.script.lock().unwrap();
            script.connects += 1;
            script.last_config = Some(config.clone());
        }
        Ok(Box::new(self.connection()))
    }
}

pub struct ScriptedConnection {
    script: Arc<Mutex<Script>>,
}

impl ScriptedConnection {
    fn record(&self, event: String) -> std::sync::MutexGuard<'_, Script> {
        let mut script = self.script.lock().unwrap();
        script.events.push(event);
        script
    }
}

fn failure(what: &str) -> SqlPropsError {
    SqlPropsError::ExecutionError(format!("scripted failure: {what}"))
}

impl DbConnection for ScriptedConnection {
    fn auto_commit(&mut self) -> Result<bool, SqlPropsError> {
        Ok(self.script.lock().unwrap().auto_commit)
    }

    fn set_auto_commit(&mut self, auto_commit: bool) -> Result<(), SqlPropsError> {
        let mut script = self.record(format!("auto_commit={auto_commit}"));
        script.auto_commit = auto_commit;
        Ok(())
    }

    fn execute_update(&mut self, sql: &str) -> Result<u64, SqlPropsError> {
        let script = self.record(format!("update:{sql}"));
        if script.failing.contains(sql) {
            return Err(failure(sql));
        }
        Ok(1)
    }

    fn execute_call(&mut self, sql: &str) -> Result<(), SqlPropsError> {
        let script = self.record(format!("call:{sql}"));
        if script.failing.contains(sql) {
            return Err(failure(sql));
        }
        Ok(())
    }

    fn query(&mut self, sql: &str) -> Result<ResultSet, SqlPropsError> {
        let script = self.record(format!("query:{sql}"));
        if script.failing.contains(sql) {
            return Err(failure(sql));
        }
        Ok(script.results.get(sql).cloned().unwrap_or_default())
    }

    fn commit(&mut self) -> Result<(), SqlPropsError> {
        let script = self.record("commit".to_string());
        if script.commit_fails {
            return Err(failure("commit"));
        }
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), SqlPropsError> {
        let script = self.record("rollback".to_string());
        if script.rollback_fails {
            return Err(failure("rollback"));
        }
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<(), SqlPropsError> {
        let script = self.record("close".to_string());
        if script.close_fails {
            return Err(failure("close"));
        }
        Ok(())
    }
}

/// Build a two-column (name, value) result from text pairs; `None` is NULL.
pub fn rows(pairs: &[(Option<&str>, Option<&str>)]) -> ResultSet {
    let mut rs = ResultSet::with_capacity(pairs.len());
    rs.set_column_names(Arc::new(vec!["name".to_string(), "value".to_string()]));
    for (name, value) in pairs {
        let to_value = |v: &Option<&str>| {
            v.map_or(RowValues::Null, |s| RowValues::Text(s.to_string()))
        };
        rs.add_row_values(vec![to_value(name), to_value(value)]);
    }
    rs
}
