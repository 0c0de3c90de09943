use crate::form_choice;

form_choice! {
    /// FFXIV market regions
    pub enum FfxivRegion {
        #[default]
        NorthAmerica => ("NA", "North America"),
        Europe => ("EU", "Europe"),
        Japan => ("JP", "Japan"),
        Oceania => ("OC", "Oceania"),
    }
}

impl FfxivRegion {
    /// Region name the backend expects in request bodies
    pub fn api_name(&self) -> &'static str {
        match self {
            FfxivRegion::NorthAmerica => "North-America",
            FfxivRegion::Europe => "Europe",
            FfxivRegion::Japan => "Japan",
            FfxivRegion::Oceania => "Oceania",
        }
    }
}

form_choice! {
    pub enum WowRegion {
        #[default]
        NorthAmerica => ("NA", "North America"),
        Europe => ("EU", "Europe"),
    }
}

impl std::str::FromStr for WowRegion {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NA" => Ok(WowRegion::NorthAmerica),
            "EU" => Ok(WowRegion::Europe),
            _ => Err(()),
        }
    }
}
