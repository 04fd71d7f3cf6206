use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::catalog::{CatalogItem, CatalogPage, CatalogRange, CatalogSource, NamedRef};
use crate::state::{
    Ability, ArtworkBundle, EntryRecord, EvolutionNode, LocalizedName, StatValue,
};

pub const API_BASE: &str = "https://pokeapi.co/api/v2";
const ARTWORK_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";

#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("{url} returned status {status}")]
    Status { status: u16, url: String },
    #[error("response parse error: {0}")]
    Parse(String),
    #[error("not found: {0}")]
    NotFound(String),
}

/// Source of catalog pages, entry records and raw artwork bytes.
#[async_trait]
pub trait EntryProvider: Send + Sync {
    async fn fetch_catalog(&self, source: &CatalogSource) -> Result<CatalogPage, ProviderError>;

    async fn fetch_entry(&self, identifier: &str) -> Result<EntryRecord, ProviderError>;

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ProviderError>;
}

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ApiResource {
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct TypeDetailResponse {
    pokemon: Vec<TypePokemonEntry>,
}

#[derive(Clone, Debug, Deserialize)]
struct TypePokemonEntry {
    pokemon: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u16,
    name: String,
    height: Option<u16>,
    weight: Option<u16>,
    types: Vec<PokemonTypeSlot>,
    stats: Vec<PokemonStatSlot>,
    abilities: Vec<PokemonAbilitySlot>,
    sprites: serde_json::Value,
    species: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u16,
    stat: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonAbilitySlot {
    ability: NamedResource,
    slot: u8,
    #[serde(default)]
    is_hidden: bool,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonSpeciesResponse {
    name: String,
    #[serde(default)]
    names: Vec<LanguageName>,
    color: Option<NamedResource>,
    generation: Option<NamedResource>,
    #[serde(default)]
    flavor_text_entries: Vec<FlavorTextEntry>,
    evolution_chain: Option<ApiResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct LanguageName {
    name: String,
    language: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct FlavorTextEntry {
    flavor_text: String,
    language: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct EvolutionChainResponse {
    chain: ChainLink,
}

#[derive(Clone, Debug, Deserialize)]
struct ChainLink {
    species: NamedResource,
    evolves_to: Vec<ChainLink>,
}

pub struct PokeApiProvider {
    client: reqwest::Client,
    base_url: String,
}

impl Default for PokeApiProvider {
    fn default() -> Self {
        Self::new(API_BASE)
    }
}

impl PokeApiProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| ProviderError::Request(err.to_string()))?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|err| ProviderError::Request(err.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ProviderError> {
        let bytes = self.get_bytes(url).await?;
        serde_json::from_slice(&bytes).map_err(|err| ProviderError::Parse(err.to_string()))
    }

    async fn fetch_range(&self, range: CatalogRange) -> Result<CatalogPage, ProviderError> {
        let url = format!(
            "{}/pokemon?limit={}&offset={}",
            self.base_url, range.limit, range.offset
        );
        self.get_json(&url).await
    }

    async fn fetch_type(&self, name: &str) -> Result<CatalogPage, ProviderError> {
        let url = format!("{}/type/{name}", self.base_url);
        let response: TypeDetailResponse = match self.get_json(&url).await {
            Ok(response) => response,
            Err(ProviderError::NotFound(_)) => return Ok(CatalogPage::empty()),
            Err(err) => return Err(err),
        };
        Ok(page_from_type(response))
    }

    async fn fetch_search(&self, query: &str) -> Result<CatalogPage, ProviderError> {
        let slug = search_slug(query);
        if slug.is_empty() {
            return Ok(CatalogPage::empty());
        }
        let url = format!("{}/pokemon/{slug}", self.base_url);
        match self.get_json::<PokemonResponse>(&url).await {
            Ok(pokemon) => Ok(CatalogPage {
                count: 1,
                results: vec![CatalogItem::Named { name: pokemon.name }],
            }),
            Err(ProviderError::NotFound(_)) => Ok(CatalogPage::empty()),
            Err(err) => Err(err),
        }
    }
}

#[async_trait]
impl EntryProvider for PokeApiProvider {
    async fn fetch_catalog(&self, source: &CatalogSource) -> Result<CatalogPage, ProviderError> {
        match source {
            CatalogSource::Range(range) => self.fetch_range(*range).await,
            CatalogSource::Type(name) => self.fetch_type(name).await,
            CatalogSource::Search(query) => self.fetch_search(query).await,
        }
    }

    async fn fetch_entry(&self, identifier: &str) -> Result<EntryRecord, ProviderError> {
        let url = format!("{}/pokemon/{identifier}", self.base_url);
        let pokemon: PokemonResponse = self.get_json(&url).await?;
        let species: PokemonSpeciesResponse = self.get_json(&pokemon.species.url).await?;
        let evolution = match species.evolution_chain.as_ref() {
            Some(chain) => {
                let response: EvolutionChainResponse = self.get_json(&chain.url).await?;
                let mut stages = Vec::new();
                build_chain_stages(&response.chain, &mut stages);
                stages
            }
            None => Vec::new(),
        };
        Ok(build_record(pokemon, species, evolution))
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        self.get_bytes(url).await
    }
}

fn page_from_type(response: TypeDetailResponse) -> CatalogPage {
    let results: Vec<CatalogItem> = response
        .pokemon
        .into_iter()
        .map(|entry| CatalogItem::Nested {
            pokemon: NamedRef {
                name: entry.pokemon.name,
            },
        })
        .collect();
    CatalogPage {
        count: results.len(),
        results,
    }
}

fn search_slug(query: &str) -> String {
    query
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

fn build_record(
    pokemon: PokemonResponse,
    species: PokemonSpeciesResponse,
    mut evolution: Vec<EvolutionNode>,
) -> EntryRecord {
    let default_art = pointer_string(&pokemon.sprites, "/other/official-artwork/front_default")
        .or_else(|| pointer_string(&pokemon.sprites, "/front_default"));
    let shiny_art = pointer_string(&pokemon.sprites, "/other/official-artwork/front_shiny")
        .or_else(|| pointer_string(&pokemon.sprites, "/front_shiny"));

    if evolution.is_empty() {
        evolution.push(EvolutionNode {
            name: species.name.clone(),
            artwork: default_art.clone(),
        });
    }

    let generation = species.generation.map(|generation| generation.name);
    EntryRecord {
        id: pokemon.id,
        name: LocalizedName {
            en: species.name.clone(),
            jp: japanese_name(&species.names),
        },
        region: generation.as_deref().and_then(region_for_generation).map(str::to_string),
        generation,
        height: pokemon.height,
        weight: pokemon.weight,
        color: species.color.map(|color| color.name),
        description: species
            .flavor_text_entries
            .iter()
            .find(|entry| entry.language.name == "en")
            .map(|entry| sanitize_text(&entry.flavor_text)),
        types: pokemon
            .types
            .into_iter()
            .map(|slot| slot.type_info.name)
            .collect(),
        abilities: pokemon
            .abilities
            .into_iter()
            .map(|slot| Ability {
                name: slot.ability.name,
                slot: slot.slot,
                hidden: slot.is_hidden,
            })
            .collect(),
        evolution,
        stats: pokemon
            .stats
            .into_iter()
            .map(|slot| StatValue {
                name: slot.stat.name,
                base: slot.base_stat,
            })
            .collect(),
        has_shiny_variant: shiny_art.is_some(),
        artwork: ArtworkBundle {
            default: default_art,
            shiny: shiny_art,
        },
    }
}

fn japanese_name(names: &[LanguageName]) -> Option<String> {
    ["ja-Hrkt", "ja"].iter().find_map(|language| {
        names
            .iter()
            .find(|entry| entry.language.name == *language)
            .map(|entry| entry.name.clone())
    })
}

fn region_for_generation(generation: &str) -> Option<&'static str> {
    let region = match generation {
        "generation-i" => "kanto",
        "generation-ii" => "johto",
        "generation-iii" => "hoenn",
        "generation-iv" => "sinnoh",
        "generation-v" => "unova",
        "generation-vi" => "kalos",
        "generation-vii" => "alola",
        "generation-viii" => "galar",
        "generation-ix" => "paldea",
        _ => return None,
    };
    Some(region)
}

fn build_chain_stages(chain: &ChainLink, stages: &mut Vec<EvolutionNode>) {
    if !stages.iter().any(|stage| stage.name == chain.species.name) {
        stages.push(EvolutionNode {
            name: chain.species.name.clone(),
            artwork: resource_id(&chain.species.url).map(artwork_url),
        });
    }
    for next in &chain.evolves_to {
        build_chain_stages(next, stages);
    }
}

/// Trailing numeric id of a resource url such as `.../pokemon-species/2/`.
fn resource_id(url: &str) -> Option<u32> {
    url.trim_end_matches('/').rsplit('/').next()?.parse().ok()
}

fn artwork_url(id: u32) -> String {
    format!("{ARTWORK_BASE}/{id}.png")
}

fn sanitize_text(text: &str) -> String {
    text.replace(['\n', '\u{000C}'], " ")
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn pokemon_json() -> serde_json::Value {
        json!({
            "id": 2,
            "name": "ivysaur",
            "height": 10,
            "weight": 130,
            "types": [
                { "slot": 1, "type": { "name": "grass", "url": "t/12" } },
                { "slot": 2, "type": { "name": "poison", "url": "t/4" } }
            ],
            "stats": [
                { "base_stat": 60, "effort": 0, "stat": { "name": "hp", "url": "s/1" } }
            ],
            "abilities": [
                { "ability": { "name": "overgrow", "url": "a/65" }, "slot": 1, "is_hidden": false },
                { "ability": { "name": "chlorophyll", "url": "a/34" }, "slot": 3, "is_hidden": true }
            ],
            "sprites": {
                "front_default": "https://img/front/2.png",
                "front_shiny": null,
                "other": {
                    "official-artwork": {
                        "front_default": "https://img/art/2.png",
                        "front_shiny": "https://img/art/shiny/2.png"
                    }
                }
            },
            "species": { "name": "ivysaur", "url": "https://pokeapi.co/api/v2/pokemon-species/2/" }
        })
    }

    fn species_json() -> serde_json::Value {
        json!({
            "name": "ivysaur",
            "names": [
                { "name": "フシギソウ", "language": { "name": "ja-Hrkt", "url": "l/1" } },
                { "name": "Ivysaur", "language": { "name": "en", "url": "l/9" } }
            ],
            "color": { "name": "green", "url": "c/5" },
            "generation": { "name": "generation-i", "url": "g/1" },
            "flavor_text_entries": [
                { "flavor_text": "Quand il\nsort", "language": { "name": "fr", "url": "l/5" } },
                { "flavor_text": "When the bulb on\nits back grows\u{000C}large", "language": { "name": "en", "url": "l/9" } }
            ],
            "evolution_chain": { "url": "https://pokeapi.co/api/v2/evolution-chain/1/" }
        })
    }

    fn chain_json() -> serde_json::Value {
        json!({
            "chain": {
                "species": { "name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon-species/1/" },
                "evolves_to": [{
                    "species": { "name": "ivysaur", "url": "https://pokeapi.co/api/v2/pokemon-species/2/" },
                    "evolves_to": [{
                        "species": { "name": "venusaur", "url": "https://pokeapi.co/api/v2/pokemon-species/3/" },
                        "evolves_to": []
                    }]
                }]
            }
        })
    }

    #[test]
    fn builds_record_from_api_payloads() {
        let pokemon: PokemonResponse = serde_json::from_value(pokemon_json()).unwrap();
        let species: PokemonSpeciesResponse = serde_json::from_value(species_json()).unwrap();
        let chain: EvolutionChainResponse = serde_json::from_value(chain_json()).unwrap();
        let mut stages = Vec::new();
        build_chain_stages(&chain.chain, &mut stages);

        let record = build_record(pokemon, species, stages);

        assert_eq!(record.id, 2);
        assert_eq!(record.name.en, "ivysaur");
        assert_eq!(record.name.jp.as_deref(), Some("フシギソウ"));
        assert_eq!(record.region.as_deref(), Some("kanto"));
        assert_eq!(record.generation.as_deref(), Some("generation-i"));
        assert_eq!(record.color.as_deref(), Some("green"));
        assert_eq!(
            record.description.as_deref(),
            Some("When the bulb on its back grows large")
        );
        assert_eq!(record.types, vec!["grass".to_string(), "poison".to_string()]);
        assert_eq!(record.abilities[1].slot, 3);
        assert!(record.abilities[1].hidden);
        assert_eq!(record.stats[0].base, 60);
        assert_eq!(record.artwork.default.as_deref(), Some("https://img/art/2.png"));
        assert!(record.has_shiny_variant);
        let names: Vec<_> = record.evolution.iter().map(|node| node.name.as_str()).collect();
        assert_eq!(names, vec!["bulbasaur", "ivysaur", "venusaur"]);
        assert_eq!(
            record.evolution[2].artwork.as_deref(),
            Some(
                "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork/3.png"
            )
        );
    }

    #[test]
    fn missing_chain_yields_single_stage() {
        let mut species = species_json();
        species["evolution_chain"] = serde_json::Value::Null;
        let pokemon: PokemonResponse = serde_json::from_value(pokemon_json()).unwrap();
        let species: PokemonSpeciesResponse = serde_json::from_value(species).unwrap();
        let record = build_record(pokemon, species, Vec::new());
        assert_eq!(record.evolution.len(), 1);
        assert_eq!(record.evolution[0].name, "ivysaur");
    }

    #[test]
    fn shiny_absent_without_sprite() {
        let mut pokemon = pokemon_json();
        pokemon["sprites"] = json!({ "front_default": "https://img/front/2.png" });
        let pokemon: PokemonResponse = serde_json::from_value(pokemon).unwrap();
        let species: PokemonSpeciesResponse = serde_json::from_value(species_json()).unwrap();
        let record = build_record(pokemon, species, Vec::new());
        assert!(!record.has_shiny_variant);
        assert_eq!(record.artwork.default.as_deref(), Some("https://img/front/2.png"));
    }

    #[test]
    fn type_pages_use_nested_shape() {
        let response: TypeDetailResponse = serde_json::from_value(json!({
            "pokemon": [
                { "pokemon": { "name": "charmander", "url": "p/4" }, "slot": 1 },
                { "pokemon": { "name": "vulpix", "url": "p/37" }, "slot": 1 }
            ]
        }))
        .unwrap();
        let page = page_from_type(response);
        assert_eq!(page.count, 2);
        assert_eq!(page.identifiers(), vec!["charmander".to_string(), "vulpix".to_string()]);
    }

    #[test]
    fn helpers() {
        assert_eq!(search_slug("  Mr  Mime "), "mr-mime");
        assert_eq!(resource_id("https://pokeapi.co/api/v2/pokemon-species/25/"), Some(25));
        assert_eq!(resource_id("https://pokeapi.co/api/v2/pokemon-species/"), None);
        assert_eq!(region_for_generation("generation-ix"), Some("paldea"));
        assert_eq!(region_for_generation("generation-x"), None);
    }
}
