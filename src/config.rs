use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

use crate::bindings::{BindChange, BindingTable, ConflictPolicy};
use crate::error::BindError;
use crate::keys::KeyCode;
use crate::pad::{MAX_PORTS, PadControl, PadType};

/// Panel configuration: global options plus the bindings of every port.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PadConfig {
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default)]
    pub always_on_top: bool,
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,
    /// Capture timeout in ms, 0 waits forever.
    #[serde(default)]
    pub capture_timeout_ms: u64,
    #[serde(default)]
    pub ports: Vec<PortConfig>,
}

/// Bindings of one (port, slot) socket.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PortConfig {
    pub port: usize,
    #[serde(default)]
    pub slot: usize,
    #[serde(default)]
    pub pad_type: PadType,
    #[serde(default, with = "binding_list")]
    pub bindings: BindingTable,
}

/// One binding as written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct KeyBinding {
    pub control: PadControl,
    pub key: String,
}

/// Standalone bindings file used by import and export.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct BindingsFile {
    #[serde(default)]
    bindings: Vec<KeyBinding>,
}

mod binding_list {
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};

    use super::KeyBinding;
    use crate::bindings::BindingTable;

    pub fn serialize<S: Serializer>(table: &BindingTable, s: S) -> Result<S::Ok, S::Error> {
        let list: Vec<KeyBinding> = table
            .iter()
            .map(|(control, key)| KeyBinding {
                control,
                key: key.name(),
            })
            .collect();
        list.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<BindingTable, D::Error> {
        let list = Vec::<KeyBinding>::deserialize(d)?;
        super::table_from_list(&list).map_err(D::Error::custom)
    }
}

fn table_from_list(list: &[KeyBinding]) -> Result<BindingTable, crate::error::BindError> {
    let mut parsed = Vec::with_capacity(list.len());
    for binding in list {
        parsed.push((binding.control, binding.key.parse::<KeyCode>()?));
    }
    let mut table = BindingTable::new();
    for control in table.replace_all(parsed) {
        warn!(?control, "duplicate key in bindings, control left unbound");
    }
    Ok(table)
}

impl PortConfig {
    pub fn new(port: usize, slot: usize) -> Self {
        Self {
            port,
            slot,
            pad_type: PadType::DualShock2,
            bindings: BindingTable::new(),
        }
    }
}

impl Default for PadConfig {
    fn default() -> Self {
        let mut first = PortConfig::new(0, 0);
        first.bindings = BindingTable::with_default_layout();
        Self {
            dark_mode: false,
            always_on_top: false,
            conflict_policy: ConflictPolicy::Steal,
            capture_timeout_ms: 0,
            ports: vec![first, PortConfig::new(1, 0)],
        }
    }
}

impl PadConfig {
    /// Default location under the user config directory.
    pub fn default_path() -> anyhow::Result<PathBuf> {
        let dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("padmap");
        Ok(dir.join("Config.toml"))
    }

    /// Load config from file, or create default if not exists
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        if !path.as_ref().exists() {
            let default_config = Self::default();
            default_config.save_to_file(&path)?;
            info!(path = %path.as_ref().display(), "created default configuration");
            return Ok(default_config);
        }
        Self::load_from_file(path)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: PadConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.validate()?;
        info!(path = %path.display(), ports = config.ports.len(), "loaded configuration");
        Ok(config)
    }

    /// Every port appears at most once and only in slot 0, so lookups by
    /// port are unambiguous.
    fn validate(&self) -> anyhow::Result<()> {
        for (i, port) in self.ports.iter().enumerate() {
            if port.port >= MAX_PORTS {
                bail!("port {} is out of range", port.port);
            }
            if port.slot != 0 {
                bail!(
                    "port {} slot {}: multitap slots are not supported",
                    port.port,
                    port.slot
                );
            }
            if self.ports[..i].iter().any(|p| p.port == port.port) {
                bail!("port {} is defined twice", port.port);
            }
        }
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let policy = match self.conflict_policy {
            ConflictPolicy::Steal => "steal",
            ConflictPolicy::Reject => "reject",
        };
        let mut result = format!(
            "dark_mode = {}               # Use dark theme\n\
             always_on_top = {}           # Keep window above other windows\n\
             conflict_policy = \"{}\"     # Key already bound elsewhere: \"steal\" or \"reject\"\n\
             capture_timeout_ms = {}       # Give up waiting for a key after this many ms (0 = never)\n\n\
             # Per-port keyboard bindings\n",
            self.dark_mode, self.always_on_top, policy, self.capture_timeout_ms,
        );

        for port in &self.ports {
            result.push_str("\n[[ports]]\n");
            result.push_str(&format!("port = {}\n", port.port));
            result.push_str(&format!("slot = {}\n", port.slot));
            result.push_str(&format!("pad_type = \"{:?}\"\n", port.pad_type));
            for (control, key) in port.bindings.iter() {
                result.push_str("\n[[ports.bindings]]\n");
                result.push_str(&format!("control = \"{:?}\"      # {}\n", control, control.label()));
                result.push_str(&format!("key = \"{}\"\n", key.name()));
            }
        }

        fs::write(path, result)?;
        info!(path = %path.display(), "saved configuration");
        Ok(())
    }

    /// Index of the socket configured for `port`.
    fn port_index(&self, port: usize) -> Result<usize, BindError> {
        self.ports
            .iter()
            .position(|p| p.port == port)
            .ok_or(BindError::InvalidPort { port })
    }

    pub fn port(&self, port: usize) -> Result<&PortConfig, BindError> {
        Ok(&self.ports[self.port_index(port)?])
    }

    pub fn port_mut(&mut self, port: usize) -> Result<&mut PortConfig, BindError> {
        let idx = self.port_index(port)?;
        Ok(&mut self.ports[idx])
    }

    /// Keysym map of `port`, in key-code order.
    pub fn keysym_map(
        &self,
        port: usize,
    ) -> Result<impl Iterator<Item = (KeyCode, PadControl)> + '_, BindError> {
        Ok(self.port(port)?.bindings.keysym_map())
    }

    /// Binds `key` to `control` on `port` under the configured conflict policy.
    pub fn set_keyboard_key(
        &mut self,
        port: usize,
        key: KeyCode,
        control: PadControl,
    ) -> Result<BindChange, BindError> {
        let policy = self.conflict_policy;
        self.port_mut(port)?.bindings.bind(control, key, policy)
    }

    pub fn unbind_key(&mut self, port: usize, key: KeyCode) -> Result<Option<PadControl>, BindError> {
        Ok(self.port_mut(port)?.bindings.unbind_key(key))
    }

    /// Resets the bindings of `port` for the given pad type.
    pub fn populate(&mut self, port: usize, pad_type: PadType) -> Result<(), BindError> {
        let entry = self.port_mut(port)?;
        entry.pad_type = pad_type;
        entry.bindings = match pad_type {
            PadType::DualShock2 => BindingTable::with_default_layout(),
            PadType::Unplugged => BindingTable::new(),
        };
        info!(port, ?pad_type, "populated port bindings");
        Ok(())
    }

    /// Writes the bindings of `port` to a standalone file.
    pub fn export_port<P: AsRef<Path>>(&self, port: usize, path: P) -> anyhow::Result<()> {
        let file = BindingsFile {
            bindings: self
                .port(port)?
                .bindings
                .iter()
                .map(|(control, key)| KeyBinding {
                    control,
                    key: key.name(),
                })
                .collect(),
        };
        fs::write(path.as_ref(), toml::to_string_pretty(&file)?)
            .with_context(|| format!("Failed to write {}", path.as_ref().display()))?;
        info!(port, path = %path.as_ref().display(), "exported bindings");
        Ok(())
    }

    /// Replaces the bindings of `port` with those of a standalone file.
    pub fn import_port<P: AsRef<Path>>(&mut self, port: usize, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file: BindingsFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        let table = table_from_list(&file.bindings)
            .with_context(|| format!("Invalid bindings in {}", path.display()))?;
        self.port_mut(port)?.bindings = table;
        info!(port, path = %path.display(), "imported bindings");
        Ok(())
    }
}
