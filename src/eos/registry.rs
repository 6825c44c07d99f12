use crate::eos::table::MaterialEos;
use crate::error::{DepositionError, DepositionResult};
use crate::material::Material;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

static GLOBAL_EOS: OnceCell<EosRegistry> = OnceCell::new();

/// EOS tables for every supported material, loaded once and then read-only.
#[derive(Clone, Debug)]
pub struct EosRegistry {
    tables: HashMap<Material, MaterialEos>,
}

impl EosRegistry {
    /// Load `<Material>.ses` for every material from `dir`.
    pub fn load_dir(dir: impl AsRef<Path>) -> DepositionResult<Self> {
        let dir = dir.as_ref();
        let mut tables = Vec::with_capacity(Material::ALL.len());
        for material in Material::ALL {
            let path = dir.join(material.eos_file_name());
            let text = fs::read_to_string(&path).map_err(|e| {
                DepositionError::lookup(format!("cannot read {}: {}", path.display(), e))
            })?;
            let eos = MaterialEos::from_sesame_str(material, &text)
                .map_err(|e| e.in_context(path.display()))?;
            tables.push(eos);
        }
        Self::from_tables(tables)
    }

    /// Build a registry from already parsed tables. Every material must be present exactly once.
    pub fn from_tables(tables: impl IntoIterator<Item = MaterialEos>) -> DepositionResult<Self> {
        let mut by_material = HashMap::new();
        for eos in tables {
            let material = eos.material;
            if by_material.insert(material, eos).is_some() {
                return Err(DepositionError::lookup(format!(
                    "duplicate EOS table for {}",
                    material
                )));
            }
        }
        for material in Material::ALL {
            if !by_material.contains_key(&material) {
                return Err(DepositionError::lookup(format!("no EOS table for {}", material)));
            }
        }
        Ok(Self { tables: by_material })
    }

    pub fn get(&self, material: Material) -> DepositionResult<&MaterialEos> {
        self.tables
            .get(&material)
            .ok_or_else(|| DepositionError::lookup(format!("no EOS table for {}", material)))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Load the process-wide registry from `dir` on first call.
    ///
    /// Later calls return the registry already loaded, whatever directory they name.
    pub fn init_global(dir: impl AsRef<Path>) -> DepositionResult<&'static EosRegistry> {
        GLOBAL_EOS.get_or_try_init(|| Self::load_dir(dir))
    }

    /// The process-wide registry, if it has been initialised.
    pub fn global() -> DepositionResult<&'static EosRegistry> {
        GLOBAL_EOS
            .get()
            .ok_or_else(|| DepositionError::lookup("EOS tables have not been loaded"))
    }
}
