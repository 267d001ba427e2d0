//! Advancement rewards appendices.

use super::{Appendix, AppendixHandler};
use crate::infobook::Item;
use crate::parse::XmlNode;
use crate::resource::{Advancement, ResourceHandler};
use crate::serialize::{FileWriter, HtmlInfoBookSerializer, SerializeContext, templates};
use anyhow::{Context, Result, bail};
use std::rc::Rc;

/// Handles advancement rewards appendices.
pub struct AppendixHandlerAdvancementRewards {
    resources: Rc<ResourceHandler>,
}

impl AppendixHandlerAdvancementRewards {
    pub fn new(resources: Rc<ResourceHandler>) -> Self {
        Self { resources }
    }
}

impl AppendixHandler for AppendixHandlerAdvancementRewards {
    fn create_appendix(&self, data: &XmlNode, _mod_id: &str) -> Result<Box<dyn Appendix>> {
        let mut advancements = Vec::new();
        for advancement in data
            .children_named("advancements")
            .flat_map(|list| list.children_named("advancement"))
        {
            let id = advancement
                .attribute("id")
                .context("Advancement element requires an id attribute")?;
            advancements.push(self.resources.get_advancement(id)?.clone());
        }

        let mut rewards = Vec::new();
        for reward in data
            .children_named("rewards")
            .flat_map(|list| list.children_named("reward"))
        {
            let reward_type = reward.attribute("type").unwrap_or("");
            if reward_type != "item" {
                bail!("Unknown advancement reward type '{reward_type}'");
            }
            let count = match reward.attribute("amount") {
                Some(raw) => raw.parse()?,
                None => 1,
            };
            let meta = match reward.attribute("meta") {
                Some(raw) => raw.parse()?,
                None => 0,
            };
            rewards.push(Item {
                item: reward.text.trim().to_owned(),
                data: meta,
                count,
                nbt: String::new(),
            });
        }

        Ok(Box::new(AdvancementRewardsAppendix {
            advancements,
            rewards,
        }))
    }
}

struct AdvancementRewardsAppendix {
    advancements: Vec<Advancement>,
    rewards: Vec<Item>,
}

impl Appendix for AdvancementRewardsAppendix {
    fn name(&self, ctx: &SerializeContext<'_>) -> Result<Option<String>> {
        Ok(Some(ctx.translate_formatted("gui.advancements")?))
    }

    fn to_html(
        &self,
        ctx: &SerializeContext<'_>,
        files: &mut FileWriter,
        serializer: &HtmlInfoBookSerializer,
    ) -> Result<String> {
        let advancements: Vec<(String, String)> = self
            .advancements
            .iter()
            .map(|advancement| {
                Ok((
                    ctx.translate_formatted(&advancement.title)?,
                    ctx.translate_formatted(&advancement.description)?,
                ))
            })
            .collect::<Result<_>>()?;
        let rewards: Vec<String> = self
            .rewards
            .iter()
            .map(|reward| serializer.create_item_display(ctx, files, reward, true, ""))
            .collect::<Result<_>>()?;
        let caption = ctx.translate_formatted(&format!("gui.{}.rewards", ctx.config.mod_id))?;
        Ok(templates::advancement_rewards(
            &advancements,
            &rewards,
            &caption,
        ))
    }
}
