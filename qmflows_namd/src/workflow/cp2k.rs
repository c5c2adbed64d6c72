use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml::Value;


/// `cp2k_general_settings` block. The CP2K templates are opaque to this tool and are passed to
/// every chunk input untouched.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Cp2kGeneralSettings {
    #[serde(default = "Cp2kGeneralSettings::default_basis")]
    basis: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    path_basis: Option<PathBuf>,

    #[serde(default = "Cp2kGeneralSettings::default_potential")]
    potential: String,

    /// A single edge length, three edge lengths or a full 3x3 cell matrix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cell_parameters: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_cell_parameters: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    cell_angles: Option<Value>,

    #[serde(default = "Cp2kGeneralSettings::default_periodic")]
    periodic: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    cp2k_settings_main: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    cp2k_settings_guess: Option<Value>,

    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}


const PERIODIC_KEYWORDS: [&str; 8] = ["none", "x", "y", "z", "xy", "xz", "yz", "xyz"];


impl Cp2kGeneralSettings {
    fn default_basis() -> String { String::from("DZVP-MOLOPT-SR-GTH") }
    fn default_potential() -> String { String::from("GTH-PBE") }
    fn default_periodic() -> String { String::from("xyz") }


    pub fn check(&self, errors: &mut Vec<String>) {
        if self.basis.trim().is_empty() {
            errors.push("Field 'cp2k_general_settings.basis' cannot be empty.".into());
        }

        if self.potential.trim().is_empty() {
            errors.push("Field 'cp2k_general_settings.potential' cannot be empty.".into());
        }

        if !PERIODIC_KEYWORDS.contains(&self.periodic.to_ascii_lowercase().as_str()) {
            errors.push(format!("Field 'cp2k_general_settings.periodic' = {:?} is not one of {:?}.",
                    self.periodic, PERIODIC_KEYWORDS));
        }

        if let Some(cell) = self.cell_parameters.as_ref() {
            if !Self::is_valid_cell(cell) {
                errors.push("Field 'cp2k_general_settings.cell_parameters' must be a number, \
                            a list of 3 numbers or a 3x3 matrix.".into());
            }
        }
    }


    fn is_valid_cell(cell: &Value) -> bool {
        let is_triple = |v: &Value| {
            v.as_sequence()
                .map(|xs| xs.len() == 3 && xs.iter().all(Value::is_number))
                .unwrap_or(false)
        };

        match cell {
            Value::Number(_) => true,
            Value::Sequence(rows) if rows.iter().all(Value::is_number) => rows.len() == 3,
            Value::Sequence(rows) => rows.len() == 3 && rows.iter().all(is_triple),
            _ => false,
        }
    }


    /// Makes the file references absolute with respect to `base`.
    pub fn absolutize(&mut self, base: &Path) {
        for p in [self.path_basis.as_mut(), self.file_cell_parameters.as_mut()].into_iter().flatten() {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        }
    }


    pub fn get_basis(&self) -> &str { &self.basis }
    pub fn get_path_basis(&self) -> Option<&Path> { self.path_basis.as_deref() }
    pub fn get_potential(&self) -> &str { &self.potential }
    pub fn get_cell_parameters(&self) -> Option<&Value> { self.cell_parameters.as_ref() }
    pub fn get_file_cell_parameters(&self) -> Option<&Path> { self.file_cell_parameters.as_deref() }
    pub fn get_periodic(&self) -> &str { &self.periodic }
    pub fn get_cp2k_settings_main(&self) -> Option<&Value> { self.cp2k_settings_main.as_ref() }
    pub fn get_cp2k_settings_guess(&self) -> Option<&Value> { self.cp2k_settings_guess.as_ref() }
    pub fn get_extra(&self) -> &BTreeMap<String, Value> { &self.extra }
}


impl Default for Cp2kGeneralSettings {
    fn default() -> Self {
        let template = |name: &str| {
            let raw = format!("specific:\n  template: {}\n", name);
            serde_yaml::from_str::<Value>(&raw).ok()
        };

        Self {
            basis: Self::default_basis(),
            path_basis: None,
            potential: Self::default_potential(),
            cell_parameters: Some(Value::from(28.0f64)),
            file_cell_parameters: None,
            cell_angles: None,
            periodic: String::from("none"),
            cp2k_settings_main: template("pbe_main"),
            cp2k_settings_guess: template("pbe_guess"),
            extra: BTreeMap::new(),
        }
    }
}


impl fmt::Display for Cp2kGeneralSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let compact = |v: &Value| serde_yaml::to_string(v)
            .map(|s| s.trim().replace('\n', "; "))
            .unwrap_or_default();

        writeln!(f, " {:>24} = {:?}", "basis", self.basis)?;
        if let Some(p) = self.path_basis.as_ref() {
            writeln!(f, " {:>24} = {:?}", "path_basis", p)?;
        }
        writeln!(f, " {:>24} = {:?}", "potential", self.potential)?;
        if let Some(c) = self.cell_parameters.as_ref() {
            writeln!(f, " {:>24} = {}", "cell_parameters", compact(c))?;
        }
        if let Some(p) = self.file_cell_parameters.as_ref() {
            writeln!(f, " {:>24} = {:?}", "file_cell_parameters", p)?;
        }
        if let Some(a) = self.cell_angles.as_ref() {
            writeln!(f, " {:>24} = {}", "cell_angles", compact(a))?;
        }
        writeln!(f, " {:>24} = {:?}", "periodic", self.periodic)?;
        if let Some(s) = self.cp2k_settings_main.as_ref() {
            writeln!(f, " {:>24} = {}", "cp2k_settings_main", compact(s))?;
        }
        if let Some(s) = self.cp2k_settings_guess.as_ref() {
            writeln!(f, " {:>24} = {}", "cp2k_settings_guess", compact(s))?;
        }
        for (k, v) in self.extra.iter() {
            writeln!(f, " {:>24} = {}", k, compact(v))?;
        }

        Ok(())
    }
}
