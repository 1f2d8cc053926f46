//! Core geometry: control rods and fuel channels
//!
//! Both are vertical lines at fixed grid columns. Rods hang from the top of the
//! core down to their insertion depth; channels span the full height.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::ReactorConfig;

/// Direction of a rod adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RodDirection {
    /// Pull the rods up (shallower)
    Withdraw,
    /// Push the rods down (deeper)
    Insert,
}

/// A single rod adjustment command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RodAdjust {
    pub direction: RodDirection,
    /// Step multiplier (1 for normal, the fast multiplier while a modifier is held)
    pub multiplier: u32,
}

impl RodAdjust {
    pub fn withdraw(multiplier: u32) -> Self {
        Self {
            direction: RodDirection::Withdraw,
            multiplier,
        }
    }

    pub fn insert(multiplier: u32) -> Self {
        Self {
            direction: RodDirection::Insert,
            multiplier,
        }
    }
}

/// Control rod bank sharing one insertion depth per rod
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlRods {
    columns: Vec<u32>,
    depths: Vec<u32>,
    cell_size: f32,
    max_depth: u32,
    step: u32,
    margin: f32,
}

impl ControlRods {
    pub fn from_config(config: &ReactorConfig) -> Self {
        let layout = &config.layout;
        let depth = layout.initial_rod_depth.clamp(1, config.grid_height);
        Self {
            columns: layout.rod_columns.clone(),
            depths: vec![depth; layout.rod_columns.len()],
            cell_size: config.cell_size,
            max_depth: config.grid_height,
            step: layout.rod_step,
            margin: layout.line_margin,
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[u32] {
        &self.columns
    }

    /// Insertion depth of each rod, in cells
    pub fn depths(&self) -> &[u32] {
        &self.depths
    }

    /// Horizontal position of rod `i`
    #[inline]
    pub fn x(&self, i: usize) -> f32 {
        self.columns[i] as f32 * self.cell_size
    }

    /// Vertical position of rod `i`'s tip
    #[inline]
    pub fn tip_y(&self, i: usize) -> f32 {
        self.depths[i] as f32 * self.cell_size
    }

    /// Move every rod, clamped to `[1, grid_height]`
    pub fn adjust(&mut self, adjust: RodAdjust) {
        let delta = self.step.saturating_mul(adjust.multiplier.max(1));
        for depth in &mut self.depths {
            *depth = match adjust.direction {
                RodDirection::Withdraw => depth.saturating_sub(delta),
                RodDirection::Insert => depth.saturating_add(delta),
            }
            .clamp(1, self.max_depth);
        }
    }

    /// Set every rod to the same depth, clamped to `[1, grid_height]`
    pub fn set_depth(&mut self, depth: u32) {
        let depth = depth.clamp(1, self.max_depth);
        self.depths.iter_mut().for_each(|d| *d = depth);
    }

    /// Index of the first rod whose shadow contains a disc at `pos`
    pub fn absorbing_rod(&self, pos: Vec2, radius: f32) -> Option<usize> {
        (0..self.columns.len()).find(|&i| {
            (pos.x - self.x(i)).abs() < radius + self.margin && pos.y < self.tip_y(i)
        })
    }
}

/// Vertical fuel channels spanning the whole core height
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelChannels {
    columns: Vec<u32>,
    cell_size: f32,
    margin: f32,
}

impl FuelChannels {
    pub fn from_config(config: &ReactorConfig) -> Self {
        Self {
            columns: config.layout.channel_columns.clone(),
            cell_size: config.cell_size,
            margin: config.layout.line_margin,
        }
    }

    pub fn columns(&self) -> &[u32] {
        &self.columns
    }

    #[inline]
    pub fn x(&self, i: usize) -> f32 {
        self.columns[i] as f32 * self.cell_size
    }

    /// Index of the first channel a disc at `pos` touches
    pub fn touching_channel(&self, pos: Vec2, radius: f32) -> Option<usize> {
        (0..self.columns.len()).find(|&i| (pos.x - self.x(i)).abs() < radius + self.margin)
    }
}
