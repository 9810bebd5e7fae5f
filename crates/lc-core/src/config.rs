use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::VarType;
use crate::value::{default_value_from_type, ScriptValue};
use crate::ScriptError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamType {
    pub id: i32,
    pub debugname: String,
    pub var_type: VarType,
    #[serde(default)]
    pub default_value: Option<ScriptValue>,
}

impl ParamType {
    pub fn default_or_zero(&self) -> ScriptValue {
        self.default_value
            .clone()
            .unwrap_or_else(|| default_value_from_type(self.var_type))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NpcType {
    pub id: i32,
    pub debugname: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default = "no_category")]
    pub category: i32,
    #[serde(default)]
    pub params: BTreeMap<i32, ScriptValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocType {
    pub id: i32,
    pub debugname: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default = "no_category")]
    pub category: i32,
    #[serde(default)]
    pub params: BTreeMap<i32, ScriptValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjType {
    pub id: i32,
    pub debugname: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default = "no_category")]
    pub category: i32,
    #[serde(default)]
    pub members: bool,
    #[serde(default)]
    pub weight: i32,
    #[serde(default = "default_cost")]
    pub cost: i32,
    #[serde(default)]
    pub stackable: bool,
    #[serde(default)]
    pub params: BTreeMap<i32, ScriptValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumType {
    pub id: i32,
    pub input_type: VarType,
    pub output_type: VarType,
    #[serde(default)]
    pub default_value: Option<ScriptValue>,
    #[serde(default)]
    pub values: BTreeMap<i32, ScriptValue>,
}

impl EnumType {
    pub fn get(&self, key: i32) -> ScriptValue {
        self.values
            .get(&key)
            .cloned()
            .or_else(|| self.default_value.clone())
            .unwrap_or_else(|| default_value_from_type(self.output_type))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbColumn {
    pub name: String,
    pub types: Vec<VarType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbTableType {
    pub id: i32,
    pub debugname: String,
    pub columns: Vec<DbColumn>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbRowType {
    pub id: i32,
    pub table: i32,
    /// Column index to the flattened tuples stored in that column.
    #[serde(default)]
    pub columns: BTreeMap<i32, Vec<ScriptValue>>,
}

/// Static config tables. Lists in JSON, indexed by id once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigTables {
    #[serde(default)]
    pub params: Vec<ParamType>,
    #[serde(default)]
    pub npcs: Vec<NpcType>,
    #[serde(default)]
    pub locs: Vec<LocType>,
    #[serde(default)]
    pub objs: Vec<ObjType>,
    #[serde(default)]
    pub enums: Vec<EnumType>,
    #[serde(default)]
    pub db_tables: Vec<DbTableType>,
    #[serde(default)]
    pub db_rows: Vec<DbRowType>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    params: BTreeMap<i32, ParamType>,
    npcs: BTreeMap<i32, NpcType>,
    locs: BTreeMap<i32, LocType>,
    objs: BTreeMap<i32, ObjType>,
    enums: BTreeMap<i32, EnumType>,
    db_tables: BTreeMap<i32, DbTableType>,
    db_rows: BTreeMap<i32, DbRowType>,
}

fn no_category() -> i32 {
    -1
}

fn default_cost() -> i32 {
    1
}

fn missing(kind: &str, id: i32) -> ScriptError {
    ScriptError::runtime(format!("{} {} does not exist.", kind, id))
}

impl ConfigStore {
    pub fn from_tables(tables: ConfigTables) -> Self {
        Self {
            params: tables.params.into_iter().map(|t| (t.id, t)).collect(),
            npcs: tables.npcs.into_iter().map(|t| (t.id, t)).collect(),
            locs: tables.locs.into_iter().map(|t| (t.id, t)).collect(),
            objs: tables.objs.into_iter().map(|t| (t.id, t)).collect(),
            enums: tables.enums.into_iter().map(|t| (t.id, t)).collect(),
            db_tables: tables.db_tables.into_iter().map(|t| (t.id, t)).collect(),
            db_rows: tables.db_rows.into_iter().map(|t| (t.id, t)).collect(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let tables: ConfigTables = serde_json::from_str(raw)?;
        Ok(Self::from_tables(tables))
    }

    pub fn param(&self, id: i32) -> Result<&ParamType, ScriptError> {
        self.params.get(&id).ok_or_else(|| missing("Param", id))
    }

    pub fn npc(&self, id: i32) -> Result<&NpcType, ScriptError> {
        self.npcs.get(&id).ok_or_else(|| missing("Npc type", id))
    }

    pub fn loc(&self, id: i32) -> Result<&LocType, ScriptError> {
        self.locs.get(&id).ok_or_else(|| missing("Loc type", id))
    }

    pub fn obj(&self, id: i32) -> Result<&ObjType, ScriptError> {
        self.objs.get(&id).ok_or_else(|| missing("Obj type", id))
    }

    pub fn enum_type(&self, id: i32) -> Result<&EnumType, ScriptError> {
        self.enums.get(&id).ok_or_else(|| missing("Enum", id))
    }

    pub fn db_table(&self, id: i32) -> Result<&DbTableType, ScriptError> {
        self.db_tables.get(&id).ok_or_else(|| missing("Db table", id))
    }

    pub fn db_row(&self, id: i32) -> Result<&DbRowType, ScriptError> {
        self.db_rows.get(&id).ok_or_else(|| missing("Db row", id))
    }

    pub fn db_rows_in_table(&self, table: i32) -> impl Iterator<Item = &DbRowType> {
        self.db_rows.values().filter(move |row| row.table == table)
    }

    /// Value of `param` on a type's param map, falling back to the param default.
    pub fn resolve_param(
        &self,
        params: &BTreeMap<i32, ScriptValue>,
        param: i32,
    ) -> Result<(VarType, ScriptValue), ScriptError> {
        let param_type = self.param(param)?;
        let value = params
            .get(&param)
            .cloned()
            .unwrap_or_else(|| param_type.default_or_zero());
        Ok((param_type.var_type, value))
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;

    fn store() -> ConfigStore {
        ConfigStore::from_json(
            r#"{
  "params": [
    {"id": 1, "debugname": "damage", "varType": "int", "defaultValue": 4},
    {"id": 2, "debugname": "title", "varType": "string"}
  ],
  "npcs": [
    {"id": 0, "debugname": "man", "name": "Man", "category": 2, "params": {"1": 9}}
  ],
  "enums": [
    {"id": 5, "inputType": "int", "outputType": "string", "defaultValue": "none",
     "values": {"1": "one"}}
  ],
  "dbTables": [{"id": 0, "debugname": "drops", "columns": [{"name": "item", "types": ["obj", "int"]}]}],
  "dbRows": [
    {"id": 0, "table": 0, "columns": {"0": [995, 10]}},
    {"id": 1, "table": 0, "columns": {"0": [1511, 1]}}
  ]
}"#,
        )
        .expect("config should parse")
    }

    #[test]
    fn resolve_param_prefers_type_value_then_default() {
        let config = store();
        let npc = config.npc(0).expect("npc should exist");
        assert_eq!(npc.category, 2);
        assert_eq!(
            config.resolve_param(&npc.params, 1).expect("param"),
            (VarType::Int, ScriptValue::Int(9))
        );
        assert_eq!(
            config.resolve_param(&BTreeMap::new(), 1).expect("param"),
            (VarType::Int, ScriptValue::Int(4))
        );
        assert_eq!(
            config.resolve_param(&npc.params, 2).expect("param"),
            (VarType::String, ScriptValue::String(String::new()))
        );
        assert!(config.resolve_param(&npc.params, 3).is_err());
    }

    #[test]
    fn enum_lookup_falls_back_to_default() {
        let config = store();
        let table = config.enum_type(5).expect("enum should exist");
        assert_eq!(table.get(1), ScriptValue::String("one".to_string()));
        assert_eq!(table.get(2), ScriptValue::String("none".to_string()));
    }

    #[test]
    fn db_rows_filter_by_table() {
        let config = store();
        assert_eq!(config.db_rows_in_table(0).count(), 2);
        assert_eq!(config.db_rows_in_table(1).count(), 0);
        assert_eq!(config.db_table(0).expect("table").columns[0].types.len(), 2);
    }

    #[test]
    fn missing_types_are_runtime_errors() {
        let config = store();
        let error = config.obj(44).expect_err("obj should be missing");
        assert_eq!(error.message, "Obj type 44 does not exist.");
    }
}
