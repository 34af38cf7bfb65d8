use serde::{Deserialize, Serialize};
use tesseract_registry::{RegistryKey, RegistryMeta, impl_registry_object};

/// Name of the registry materials are registered into.
pub const MATERIAL_REGISTRY: &str = "material";

/// Physical properties of a material. Unset properties describe air at 25°C
/// that neither conducts nor burns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaterialProperties {
	/// kg/m³.
	pub density: f32,
	/// Mohs scale.
	pub hardness: f32,

	pub electrical_conductor: bool,
	pub electrical_insulator: bool,
	/// Ω·m at 20°C.
	pub electrical_resistivity: f32,
	/// Change in resistivity per °C.
	pub resistance_temperature_coefficient: f32,

	/// W·m⁻¹·K⁻¹.
	pub thermal_conductivity: f32,

	pub flammable: bool,
	/// Auto-ignition temperature in °C.
	pub ignition_temperature: f32,
	/// J/kg released when burnt.
	pub combustion_energy_density: f32,
	pub oxidizer: bool,
	/// °C added to combustion temperature when acting as oxidizer.
	pub oxidizer_temperature_boost: f32,
	/// J/kg added to combustion output when acting as oxidizer.
	pub oxidizer_energy_boost: f32,
}

impl Default for MaterialProperties {
	fn default() -> Self {
		Self {
			density: 0.0,
			hardness: 0.0,
			electrical_conductor: false,
			electrical_insulator: false,
			electrical_resistivity: f32::INFINITY,
			resistance_temperature_coefficient: 0.0,
			thermal_conductivity: 0.026,
			flammable: false,
			ignition_temperature: f32::INFINITY,
			combustion_energy_density: 0.0,
			oxidizer: false,
			oxidizer_temperature_boost: 0.0,
			oxidizer_energy_boost: 0.0,
		}
	}
}

/// A registered material.
#[derive(Debug)]
pub struct Material {
	meta: RegistryMeta,
	properties: MaterialProperties,
}

impl_registry_object!(Material);

impl Material {
	pub fn new(key: RegistryKey, properties: MaterialProperties) -> Self {
		Self {
			meta: RegistryMeta::new(key),
			properties,
		}
	}

	pub fn key(&self) -> &RegistryKey {
		self.meta.key()
	}

	pub fn properties(&self) -> &MaterialProperties {
		&self.properties
	}

	/// True if the material burns at or below `temperature` °C.
	pub fn ignites_at(&self, temperature: f32) -> bool {
		self.properties.flammable && temperature >= self.properties.ignition_temperature
	}
}
