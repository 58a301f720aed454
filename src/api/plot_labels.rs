use crate::api::context::{PlotContext, View};
use crate::core::scenario::REF_CODE;

const DELTA_PREFIX: &str = "Δ";
const SEPARATOR: &str = " - ";

#[must_use]
pub fn plot_title(context: &PlotContext) -> String {
    context.variable.description.clone()
}

/// Subtitle identifying what the figure shows.
#[must_use]
pub fn plot_code(context: &PlotContext) -> String {
    let variable = &context.variable.code;
    let mut parts: Vec<String> = Vec::new();

    match context.view {
        View::TimeSeries | View::Bias | View::Cycle => {
            parts.push(variable.clone());
            if context.view == View::Cycle {
                parts.push(context.horizon.clone());
            }
            if let Some(scenario) = context.selected_scenario() {
                parts.push(scenario.label);
            }
            if let Some(simulation) = context.selected_simulation() {
                if !context.scenario.is_specific() {
                    if let Some(scenario) = simulation
                        .scenario
                        .as_deref()
                        .and_then(|code| context.scenario_by_code(code))
                    {
                        parts.push(scenario.label);
                    }
                }
                if !simulation.rcm.is_empty() || !simulation.gcm.is_empty() {
                    parts.push(format!("{}_{}", simulation.rcm, simulation.gcm));
                }
            }
        }
        View::Table => {
            parts.push(variable.clone());
            parts.push(context.horizon.clone());
        }
        View::Map => {
            parts.push(variable.clone());
            parts.push(context.horizon.clone());
            let scenario = context.selected_scenario();
            if let Some(scenario) = &scenario {
                parts.push(scenario.label.clone());
            }
            let is_reference = scenario.as_ref().is_some_and(|s| s.code == REF_CODE);
            if !is_reference {
                if let Some(statistic) = context.map_statistic {
                    parts.push(statistic.description());
                }
            }
        }
        View::Cluster | View::Taylor => parts.push(variable.clone()),
    }

    with_delta_prefix(context, parts.join(SEPARATOR))
}

/// Value axis label, prefixed in delta mode.
#[must_use]
pub fn value_axis_label(context: &PlotContext) -> String {
    with_delta_prefix(context, context.variable.label.clone())
}

fn with_delta_prefix(context: &PlotContext, text: String) -> String {
    if context.delta {
        format!("{DELTA_PREFIX}{text}")
    } else {
        text
    }
}
