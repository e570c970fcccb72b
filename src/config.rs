use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_MAX_PREREQUISITE_DEPTH: usize = 64;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefineConfig {
    pub iterations: usize,
    pub attraction: f32,
    pub repulsion: f32,
    pub damping: f32,
    pub max_step: f32,
    /// Stop once a full sweep moves no course further than this. Zero disables.
    pub plateau_epsilon: f32,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            iterations: 800,
            attraction: 0.08,
            repulsion: 0.5,
            damping: 0.85,
            max_step: 600.0,
            plateau_epsilon: 0.01,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinimizeConfig {
    pub passes: usize,
    pub candidate_offsets: Vec<f32>,
    pub damping: f32,
    pub max_step: f32,
    pub target_intersections: usize,
}

impl Default for MinimizeConfig {
    fn default() -> Self {
        Self {
            passes: 60,
            candidate_offsets: vec![-30.0, -15.0, 15.0, 30.0],
            damping: 0.75,
            max_step: 50.0,
            target_intersections: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub node_width: f32,
    pub node_height: f32,
    pub level_height: f32,
    pub node_spacing: f32,
    pub cluster_spacing: f32,
    pub separation_margin: f32,
    pub wave_amplitude: f32,
    pub wave_frequency: f32,
    pub max_prerequisite_depth: usize,
    pub refine: RefineConfig,
    pub minimize: MinimizeConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 300.0,
            node_height: 100.0,
            level_height: 280.0,
            node_spacing: 40.0,
            cluster_spacing: 120.0,
            separation_margin: 80.0,
            wave_amplitude: 60.0,
            wave_frequency: 0.7,
            max_prerequisite_depth: DEFAULT_MAX_PREREQUISITE_DEPTH,
            refine: RefineConfig::default(),
            minimize: MinimizeConfig::default(),
        }
    }
}

impl LayoutConfig {
    /// Same-level courses closer than this repel each other.
    pub fn min_separation(&self) -> f32 {
        self.node_width + self.separation_margin
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub layout: LayoutConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefineConfigFile {
    iterations: Option<usize>,
    attraction: Option<f32>,
    repulsion: Option<f32>,
    damping: Option<f32>,
    max_step: Option<f32>,
    plateau_epsilon: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MinimizeConfigFile {
    passes: Option<usize>,
    candidate_offsets: Option<Vec<f32>>,
    damping: Option<f32>,
    max_step: Option<f32>,
    target_intersections: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    node_width: Option<f32>,
    node_height: Option<f32>,
    level_height: Option<f32>,
    node_spacing: Option<f32>,
    cluster_spacing: Option<f32>,
    separation_margin: Option<f32>,
    wave_amplitude: Option<f32>,
    wave_frequency: Option<f32>,
    max_prerequisite_depth: Option<usize>,
    refine: Option<RefineConfigFile>,
    minimize: Option<MinimizeConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses a JSON5 document of overrides and merges it onto the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = json5::from_str(contents)?;
    let layout = &mut config.layout;

    if let Some(v) = parsed.node_width {
        layout.node_width = v;
    }
    if let Some(v) = parsed.node_height {
        layout.node_height = v;
    }
    if let Some(v) = parsed.level_height {
        layout.level_height = v;
    }
    if let Some(v) = parsed.node_spacing {
        layout.node_spacing = v;
    }
    if let Some(v) = parsed.cluster_spacing {
        layout.cluster_spacing = v;
    }
    if let Some(v) = parsed.separation_margin {
        layout.separation_margin = v;
    }
    if let Some(v) = parsed.wave_amplitude {
        layout.wave_amplitude = v;
    }
    if let Some(v) = parsed.wave_frequency {
        layout.wave_frequency = v;
    }
    if let Some(v) = parsed.max_prerequisite_depth {
        layout.max_prerequisite_depth = v.max(1);
    }

    if let Some(refine) = parsed.refine {
        if let Some(v) = refine.iterations {
            layout.refine.iterations = v;
        }
        if let Some(v) = refine.attraction {
            layout.refine.attraction = v;
        }
        if let Some(v) = refine.repulsion {
            layout.refine.repulsion = v;
        }
        if let Some(v) = refine.damping {
            layout.refine.damping = v;
        }
        if let Some(v) = refine.max_step {
            layout.refine.max_step = v.abs();
        }
        if let Some(v) = refine.plateau_epsilon {
            layout.refine.plateau_epsilon = v.max(0.0);
        }
    }

    if let Some(minimize) = parsed.minimize {
        if let Some(v) = minimize.passes {
            layout.minimize.passes = v;
        }
        if let Some(v) = minimize.candidate_offsets {
            layout.minimize.candidate_offsets = v.into_iter().filter(|o| *o != 0.0).collect();
        }
        if let Some(v) = minimize.damping {
            layout.minimize.damping = v;
        }
        if let Some(v) = minimize.max_step {
            layout.minimize.max_step = v.abs();
        }
        if let Some(v) = minimize.target_intersections {
            layout.minimize.target_intersections = v;
        }
    }

    Ok(config)
}
