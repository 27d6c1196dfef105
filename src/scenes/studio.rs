use log::{debug, info};

use super::{bust, lychee, overhead_light, plant, table, torus_knot, Paper};
use crate::config::AppConfig;
use crate::scene::{DirectionalLight, DisposalList, Group, Scene, SceneContext, UpdateList};

/// Table top still life around the folding sheet
pub struct RusticStudio {
    pub groups: Vec<Group>,
    pub lights: Vec<DirectionalLight>,
}

impl RusticStudio {
    pub fn new(ctx: &mut SceneContext<'_>, config: &AppConfig) -> Self {
        let lights = vec![overhead_light(config.light.intensity)];

        let groups = vec![
            table(ctx),
            plant(ctx),
            lychee(ctx),
            bust(ctx),
            torus_knot(ctx),
            Paper::new(ctx, &config.paper, config.fold).into_group(),
        ];

        Self { groups, lights }
    }
}

/// Root scene owning the studio, its frame callbacks and disposal list
pub struct FoldingScene;

impl FoldingScene {
    pub fn build(config: &AppConfig) -> Scene {
        let mut update_list = UpdateList::new();
        let mut disposal = DisposalList::new();

        let studio = {
            let mut ctx = SceneContext {
                update_list: &mut update_list,
                disposal: &mut disposal,
                assets_dir: config.assets_dir.clone(),
            };
            RusticStudio::new(&mut ctx, config)
        };

        let mut scene = Scene::new(update_list, disposal);
        scene.groups = studio.groups;
        scene.lights = studio.lights;
        scene.ambient = config.light.ambient;

        info!(
            "Folding scene: {} groups, {} meshes, {} frame callbacks",
            scene.groups.len(),
            scene.mesh_count(),
            scene.update_count()
        );
        if let Some(bounds) = scene.bounds() {
            debug!("Scene extent {:?} to {:?}", bounds.min, bounds.max);
        }
        scene
    }
}
