use std::collections::{HashMap, HashSet, VecDeque};

use serde_json::{json, Value};

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;
pub const REMOTE_MODE_REQUIRED: i64 = -32693;

/// Robot mode ordinals as the controller reports them.
pub const MODE_TEACHING: i64 = 0;
pub const MODE_OPERATING: i64 = 1;
pub const MODE_REMOTE: i64 = 2;

/// Methods rejected with -32693 unless the simulated pendant is in remote mode.
const WRITE_METHODS: &[&str] = &[
    "setCollisionEnable",
    "set_servo_status",
    "setSysVarB",
    "setSysVarI",
    "setSysVarD",
    "stop",
    "pause",
    "run",
    "setSpeed",
    "runJbi",
];

/// Simulated controller state, shared by every connection.
#[derive(Clone, Debug)]
pub struct SimState {
    pub robot_state: i64,
    pub robot_mode: i64,
    pub collision_enable: bool,
    pub servo_on: bool,
    pub speed: f64,
    pub sys_var_b: HashMap<u64, Value>,
    pub sys_var_i: HashMap<u64, Value>,
    pub sys_var_d: HashMap<u64, Value>,
    pub jbi_files: HashSet<String>,
    pub running_jbi: Option<String>,
    /// Method names in the order they were received.
    pub journal: Vec<String>,
    /// Lines answered verbatim, one per request, before normal dispatch.
    pub raw_replies: VecDeque<String>,
    /// Write each reply in two pieces to exercise client-side reassembly.
    pub split_replies: bool,
}

impl Default for SimState {
    fn default() -> Self {
        Self {
            robot_state: 0,
            robot_mode: MODE_REMOTE,
            collision_enable: false,
            servo_on: false,
            speed: 50.0,
            sys_var_b: HashMap::new(),
            sys_var_i: HashMap::new(),
            sys_var_d: HashMap::new(),
            jbi_files: ["cashify", "trial"].iter().map(|s| s.to_string()).collect(),
            running_jbi: None,
            journal: Vec::new(),
            raw_replies: VecDeque::new(),
            split_replies: false,
        }
    }
}

impl SimState {
    pub fn remote_mode(&self) -> bool {
        self.robot_mode == MODE_REMOTE
    }

    /// Answers one request line. The reply carries no terminator.
    pub fn handle_line(&mut self, line: &str) -> String {
        match serde_json::from_str::<Value>(line) {
            Ok(request) => self.handle_request(&request),
            Err(e) => error_reply(Value::Null, PARSE_ERROR, &format!("Parse error: {}", e)),
        }
    }

    pub fn handle_request(&mut self, request: &Value) -> String {
        let id = request.get("id").cloned().unwrap_or(Value::Null);
        let method = match request.get("method").and_then(Value::as_str) {
            Some(method) => method.to_string(),
            None => return error_reply(id, INVALID_REQUEST, "Invalid Request"),
        };
        self.journal.push(method.clone());

        if let Some(raw) = self.raw_replies.pop_front() {
            return raw;
        }

        if WRITE_METHODS.contains(&method.as_str()) && !self.remote_mode() {
            return error_reply(id, REMOTE_MODE_REQUIRED, "remote mode is not enabled");
        }

        let params = request.get("params").cloned().unwrap_or(Value::Null);
        match self.dispatch(&method, &params) {
            Ok(result) => success_reply(id, &result),
            Err((code, message)) => error_reply(id, code, &message),
        }
    }

    fn dispatch(&mut self, method: &str, params: &Value) -> Result<Value, (i64, String)> {
        match method {
            "getRobotState" => Ok(json!(self.robot_state)),
            "getRobotMode" => Ok(json!(self.robot_mode)),
            "getCollisionEnable" => Ok(json!(self.collision_enable as i64)),
            "setCollisionEnable" => {
                self.collision_enable = param(params, "enable", Value::as_bool)?;
                Ok(json!(true))
            }
            "getServoStatus" => Ok(json!(self.servo_on)),
            "set_servo_status" => match param(params, "status", Value::as_i64)? {
                0 => {
                    self.servo_on = false;
                    Ok(json!(true))
                }
                1 => {
                    self.servo_on = true;
                    Ok(json!(true))
                }
                other => Err((INVALID_PARAMS, format!("servo status {} is not 0 or 1", other))),
            },
            "stop" => {
                self.robot_state = 0;
                self.running_jbi = None;
                Ok(json!(true))
            }
            "pause" => {
                self.robot_state = 1;
                Ok(json!(true))
            }
            "run" => {
                self.robot_state = 3;
                Ok(json!(true))
            }
            "setSpeed" => {
                let value = param(params, "value", Value::as_f64)?;
                if !(0.05..=100.0).contains(&value) {
                    return Err((INVALID_PARAMS, format!("speed {} outside [0.05, 100]", value)));
                }
                self.speed = value;
                Ok(json!(true))
            }
            "getSysVarB" | "getSysVarI" | "getSysVarD" => {
                let addr = param(params, "addr", Value::as_u64)?;
                let store = self.variable_store(&method[3..]);
                Ok(store.get(&addr).cloned().unwrap_or_else(|| json!(0)))
            }
            "setSysVarB" | "setSysVarI" | "setSysVarD" => {
                let addr = param(params, "addr", Value::as_u64)?;
                let value = match params.get("value") {
                    Some(value) if value.is_number() => value.clone(),
                    _ => return Err((INVALID_PARAMS, "missing numeric value".to_string())),
                };
                self.variable_store(&method[3..]).insert(addr, value);
                Ok(json!(true))
            }
            "checkJbiExist" => {
                let filename = param(params, "filename", |v| v.as_str().map(str::to_string))?;
                Ok(json!(self.jbi_files.contains(&filename) as i64))
            }
            "runJbi" => {
                let filename = param(params, "filename", |v| v.as_str().map(str::to_string))?;
                if !self.jbi_files.contains(&filename) {
                    return Err((INTERNAL_ERROR, format!("jbi file {} not found", filename)));
                }
                if !self.servo_on {
                    return Err((INTERNAL_ERROR, "servo is off".to_string()));
                }
                self.running_jbi = Some(filename);
                self.robot_state = 3;
                Ok(json!(true))
            }
            "getJbiState" => {
                let run_state = match (&self.running_jbi, self.robot_state) {
                    (None, _) => 0,
                    (Some(_), 1) => 3,
                    (Some(_), _) => 2,
                };
                Ok(json!({
                    "jbiName": self.running_jbi.clone().unwrap_or_default(),
                    "runState": run_state,
                }))
            }
            _ => Err((METHOD_NOT_FOUND, "Method not found".to_string())),
        }
    }

    fn variable_store(&mut self, kind: &str) -> &mut HashMap<u64, Value> {
        match kind {
            "SysVarB" => &mut self.sys_var_b,
            "SysVarI" => &mut self.sys_var_i,
            _ => &mut self.sys_var_d,
        }
    }
}

fn param<T, F>(params: &Value, key: &str, extract: F) -> Result<T, (i64, String)>
where
    F: Fn(&Value) -> Option<T>,
{
    params
        .get(key)
        .and_then(extract)
        .ok_or_else(|| (INVALID_PARAMS, format!("missing or invalid param '{}'", key)))
}

/// The real controller double-encodes results as a JSON string.
pub fn success_reply(id: Value, result: &Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "result": result.to_string(),
        "id": id,
    })
    .to_string()
}

pub fn error_reply(id: Value, code: i64, message: &str) -> String {
    json!({
        "jsonrpc": "2.0",
        "error": { "code": code, "message": message },
        "id": id,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: &str, params: Value) -> Value {
        json!({ "method": method, "params": params, "jsonrpc": "2.0", "id": 9 })
    }

    #[test]
    fn results_are_double_encoded() {
        let mut state = SimState::default();
        state.robot_state = 3;
        let reply: Value = serde_json::from_str(&state.handle_request(&request("getRobotState", json!([])))).unwrap();
        assert_eq!(reply["result"], json!("3"));
        assert_eq!(reply["id"], json!(9));
    }

    #[test]
    fn writes_need_remote_mode() {
        let mut state = SimState::default();
        state.robot_mode = MODE_TEACHING;
        let reply: Value = serde_json::from_str(&state.handle_request(&request("stop", json!([])))).unwrap();
        assert_eq!(reply["error"]["code"], json!(REMOTE_MODE_REQUIRED));
        assert_eq!(state.journal, vec!["stop".to_string()]);
    }

    #[test]
    fn unknown_method_is_rejected() {
        let mut state = SimState::default();
        let reply: Value = serde_json::from_str(&state.handle_request(&request("dance", json!([])))).unwrap();
        assert_eq!(reply["error"]["code"], json!(METHOD_NOT_FOUND));
    }

    #[test]
    fn garbage_gets_parse_error() {
        let mut state = SimState::default();
        let reply: Value = serde_json::from_str(&state.handle_line("{nope")).unwrap();
        assert_eq!(reply["error"]["code"], json!(PARSE_ERROR));
        assert!(reply["id"].is_null());
        assert!(state.journal.is_empty());
    }
}
