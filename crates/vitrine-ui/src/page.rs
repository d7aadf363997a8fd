use vitrine_engine::core::{App, AppControl, Dispatch, FrameFired, HostCtx, TimerFired};
use vitrine_engine::dom::NodeId;
use vitrine_engine::runtime::OwnerId;

use crate::component::Component;
use crate::error::ConfigError;
use crate::form::{FormOptions, FormTransport, FormValidator};
use crate::marquee::{MarqueeEngine, TickerConfig};
use crate::registry::MarqueeRegistry;
use crate::slider::Slider;

/// One marquee mount point.
#[derive(Debug, Clone)]
pub struct MarqueeMount {
    pub key: String,
    pub selector: String,
    pub config: TickerConfig,
    /// Mount every match, keyed `key`, `key-2`, `key-3`, ...
    pub every_match: bool,
}

#[derive(Debug, Clone)]
pub struct FormMount {
    pub selector: String,
    pub options: FormOptions,
}

/// What [`Page::mount`] looks for.
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub marquees: Vec<MarqueeMount>,
    pub slider_selector: Option<String>,
    pub forms: Vec<FormMount>,
    /// Every form matching this gets a validator with default options.
    pub auto_form_selector: Option<String>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            marquees: vec![
                MarqueeMount {
                    key: "client".into(),
                    selector: "#logo-masonry-marquee".into(),
                    config: TickerConfig::default().speed(30.0),
                    every_match: false,
                },
                MarqueeMount {
                    key: "team".into(),
                    selector: ".marquee-track-top, .client-marquee-track, #marquee-track".into(),
                    config: TickerConfig::default().speed(50.0),
                    every_match: true,
                },
            ],
            slider_selector: Some(".slider-container".into()),
            forms: vec![FormMount {
                selector: "#footerForm".into(),
                options: FormOptions::default().submit_url("/api/contact/submit"),
            }],
            auto_form_selector: Some("[data-validate]".into()),
        }
    }
}

/// Builds the transport for a form given its submit URL.
pub type TransportFactory<'a> = dyn FnMut(&str) -> Box<dyn FormTransport> + 'a;

/// Every component mounted on one document.
#[derive(Debug, Default)]
pub struct Page {
    marquees: MarqueeRegistry,
    sliders: Vec<Slider>,
    forms: Vec<(String, FormValidator)>,
    mounted: Vec<NodeId>,
}

impl Page {
    /// Mounts what `config` names. Absent targets and sliders missing parts
    /// are skipped; any other error unmounts everything mounted so far.
    pub fn mount(
        ctx: &mut HostCtx<'_>,
        config: &PageConfig,
        transports: &mut TransportFactory<'_>,
    ) -> Result<Self, ConfigError> {
        let mut page = Self::default();
        if let Err(e) = page.mount_all(ctx, config, transports) {
            log::error!("page mount failed: {e}");
            page.destroy(ctx);
            return Err(e);
        }
        log::info!(
            "page mounted: {} marquees, {} sliders, {} forms",
            page.marquees.len(),
            page.sliders.len(),
            page.forms.len()
        );
        Ok(page)
    }

    fn mount_all(
        &mut self,
        ctx: &mut HostCtx<'_>,
        config: &PageConfig,
        transports: &mut TransportFactory<'_>,
    ) -> Result<(), ConfigError> {
        for mount in &config.marquees {
            self.mount_marquees(ctx, mount)?;
        }

        if let Some(selector) = &config.slider_selector {
            for container in ctx.surface.query_all(None, selector) {
                match Slider::create(ctx, container) {
                    Ok(slider) => self.sliders.push(slider),
                    Err(ConfigError::MissingElement { what }) => {
                        log::warn!("slider on node #{}: missing {what}, skipped", container.index());
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        for mount in &config.forms {
            match ctx.surface.query(None, &mount.selector) {
                Some(node) => self.mount_form(ctx, node, mount.options.clone(), transports)?,
                None => log::info!("no form for {}, skipped", mount.selector),
            }
        }
        if let Some(selector) = &config.auto_form_selector {
            for node in ctx.surface.query_all(None, selector) {
                self.mount_form(ctx, node, FormOptions::default(), transports)?;
            }
        }
        Ok(())
    }

    fn mount_marquees(&mut self, ctx: &mut HostCtx<'_>, mount: &MarqueeMount) -> Result<(), ConfigError> {
        let mut tracks = ctx.surface.query_all(None, &mount.selector);
        if !mount.every_match {
            tracks.truncate(1);
        }
        if tracks.is_empty() {
            log::info!("no element for marquee `{}` ({}), skipped", mount.key, mount.selector);
        }

        let mut n = 0;
        for track in tracks {
            if self.mounted.contains(&track) {
                log::debug!("node #{} already mounted, skipped", track.index());
                continue;
            }
            let engine = MarqueeEngine::create(ctx, track, mount.config.clone())?;
            n += 1;
            let key = if n == 1 { mount.key.clone() } else { format!("{}-{n}", mount.key) };
            if let Some(mut old) = self.marquees.insert(key, engine) {
                old.destroy(ctx);
            }
            self.mounted.push(track);
        }
        Ok(())
    }

    fn mount_form(
        &mut self,
        ctx: &mut HostCtx<'_>,
        node: NodeId,
        options: FormOptions,
        transports: &mut TransportFactory<'_>,
    ) -> Result<(), ConfigError> {
        if self.mounted.contains(&node) {
            return Ok(());
        }
        let key = match ctx.surface.attribute(node, "id") {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => format!("form-{}", self.forms.len() + 1),
        };
        let transport = transports(&options.submit_url);
        let validator = FormValidator::create(ctx, node, options, transport)?;
        self.forms.push((key, validator));
        self.mounted.push(node);
        Ok(())
    }

    pub fn registry(&self) -> &MarqueeRegistry {
        &self.marquees
    }

    pub fn registry_mut(&mut self) -> &mut MarqueeRegistry {
        &mut self.marquees
    }

    pub fn sliders(&self) -> &[Slider] {
        &self.sliders
    }

    pub fn slider_mut(&mut self, index: usize) -> Option<&mut Slider> {
        self.sliders.get_mut(index)
    }

    pub fn form_keys(&self) -> impl Iterator<Item = &str> {
        self.forms.iter().map(|(k, _)| k.as_str())
    }

    pub fn form(&self, key: &str) -> Option<&FormValidator> {
        self.forms.iter().find(|(k, _)| k == key).map(|(_, f)| f)
    }

    pub fn form_mut(&mut self, key: &str) -> Option<&mut FormValidator> {
        self.forms.iter_mut().find(|(k, _)| k == key).map(|(_, f)| f)
    }

    fn component_mut(&mut self, owner: OwnerId) -> Option<&mut dyn Component> {
        let marquees = self.marquees.iter_mut().map(|(_, m)| m as &mut dyn Component);
        let sliders = self.sliders.iter_mut().map(|s| s as &mut dyn Component);
        let forms = self.forms.iter_mut().map(|(_, f)| f as &mut dyn Component);
        marquees.chain(sliders).chain(forms).find(|c| c.owner() == owner)
    }

    /// Tears down every component.
    pub fn destroy(&mut self, ctx: &mut HostCtx<'_>) {
        self.marquees.destroy_all(ctx);
        for slider in &mut self.sliders {
            slider.destroy(ctx);
        }
        for (_, form) in &mut self.forms {
            form.destroy(ctx);
        }
        self.sliders.clear();
        self.forms.clear();
        self.mounted.clear();
    }
}

impl App for Page {
    fn on_event(&mut self, ctx: &mut HostCtx<'_>, dispatch: &Dispatch) -> AppControl {
        if let Some(c) = self.component_mut(dispatch.owner) {
            c.handle_event(ctx, dispatch);
        }
        AppControl::Continue
    }

    fn on_timer(&mut self, ctx: &mut HostCtx<'_>, timer: TimerFired) -> AppControl {
        if let Some(c) = self.component_mut(timer.owner) {
            c.handle_timer(ctx, timer);
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut HostCtx<'_>, frame: FrameFired) -> AppControl {
        if let Some(c) = self.component_mut(frame.owner) {
            c.handle_frame(ctx, frame);
        }
        AppControl::Continue
    }
}
