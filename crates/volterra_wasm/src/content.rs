//! Static descriptive content for the dashboard's accordion panels.

use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ContentSection {
    pub title: &'static str,
    pub body: &'static str,
}

const MODEL_DESCRIPTION: &str = "\
The Lotka-Volterra equations are a pair of differential equations often \
used to describe dynamics in biological systems, especially when two \
species interact: one as prey and the other as predator. These are the \
most basic two-species predator-prey models; they assume that the only \
food source of the predator species is the prey population and that \
there is no competition between individuals of the same species.";

const PARAMETER_GLOSSARY: &str = "\
* r: growth rate of the prey population
* c: rate of prey decline due to predation
* b: rate of predator population growth; reproductive success of the \
predators is tied directly to predation activity
* m: mortality rate of the predator population";

const INITIAL_CONDITIONS: &str = "\
* Prey = 20
* Predators = 5";

const GUIDED_QUESTIONS: &str = "\
1. Assuming a prey birth rate of 80% per year (r = 0.80), observe what \
happens to the two populations starting from 20 prey and 5 predators, \
with c = 0.1, b = 0.02 and m = 0.50. What is the oscillation period, and \
what are the largest prey and predator populations reached?
2. Keep the same rates as in item 1 and consider the initial conditions \
N = (20 prey, 10 predators), N = (10 prey, 100 predators), and \
N = (100 prey, 10 predators). Check what happens.
3. Redo item 1 changing the rate b to b = 0.08. Analyze the oscillation \
period and the maximum population sizes as well.";

pub fn sections() -> Vec<ContentSection> {
    vec![
        ContentSection {
            title: "Model description",
            body: MODEL_DESCRIPTION,
        },
        ContentSection {
            title: "Model parameters",
            body: PARAMETER_GLOSSARY,
        },
        ContentSection {
            title: "Initial conditions",
            body: INITIAL_CONDITIONS,
        },
        ContentSection {
            title: "Questions",
            body: GUIDED_QUESTIONS,
        },
    ]
}

/// The accordion content, serialized for the JS side.
#[wasm_bindgen]
pub fn description_sections() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&sections()).map_err(|e| JsValue::from_str(&e.to_string()))
}
