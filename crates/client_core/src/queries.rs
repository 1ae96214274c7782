//! GraphQL documents sent to the PokeAPI endpoint.

macro_rules! pokemon_fields {
    () => {
        r#"
      id
      name
      height
      weight
      pokemon_v2_pokemontypes {
        pokemon_v2_type {
          name
        }
      }
      pokemon_v2_pokemonsprites {
        sprites
      }
      pokemon_v2_pokemonstats {
        base_stat
        pokemon_v2_stat {
          name
        }
      }
      pokemon_v2_pokemonmoves(limit: 2) {
        pokemon_v2_move {
          name
        }
      }
      pokemon_v2_pokemonspecy {
        pokemon_v2_pokemonspeciesflavortexts(where: {language_id: {_eq: 9}}, limit: 1) {
          flavor_text
        }
      }
"#
    };
}

pub const LIST_POKEMONS_PAGINATED: &str = concat!(
    r#"query ListPokemonsPaginated($limit: Int!, $offset: Int!, $orderBy: [pokemon_v2_pokemon_order_by!]) {
    pokemon_v2_pokemon(limit: $limit, offset: $offset, order_by: $orderBy) {"#,
    pokemon_fields!(),
    r#"    }
    pokemon_v2_pokemon_aggregate {
      aggregate {
        count
      }
    }
  }"#
);

pub const SEARCH_POKEMONS_BY_NAME_PAGINATED: &str = concat!(
    r#"query SearchPokemonsByName($name: String!, $limit: Int!, $offset: Int!) {
    pokemon_v2_pokemon(where: {name: {_ilike: $name}}, order_by: {name: asc}, limit: $limit, offset: $offset) {"#,
    pokemon_fields!(),
    r#"    }
    pokemon_v2_pokemon_aggregate(where: {name: {_ilike: $name}}) {
      aggregate {
        count
      }
    }
  }"#
);

pub const SEARCH_POKEMONS_BY_ID_PAGINATED: &str = concat!(
    r#"query SearchPokemonsById($id: Int!, $limit: Int!, $offset: Int!) {
    pokemon_v2_pokemon(where: {id: {_eq: $id}}, limit: $limit, offset: $offset) {"#,
    pokemon_fields!(),
    r#"    }
    pokemon_v2_pokemon_aggregate(where: {id: {_eq: $id}}) {
      aggregate {
        count
      }
    }
  }"#
);

pub const SEARCH_POKEMONS_BY_TYPE_PAGINATED: &str = concat!(
    r#"query SearchPokemonsByType($typeName: String!, $limit: Int!, $offset: Int!) {
    pokemon_v2_pokemon(where: {pokemon_v2_pokemontypes: {pokemon_v2_type: {name: {_ilike: $typeName}}}}, order_by: {id: asc}, limit: $limit, offset: $offset) {"#,
    pokemon_fields!(),
    r#"    }
    pokemon_v2_pokemon_aggregate(where: {pokemon_v2_pokemontypes: {pokemon_v2_type: {name: {_ilike: $typeName}}}}) {
      aggregate {
        count
      }
    }
  }"#
);

pub const GET_POKEMON: &str = concat!(
    r#"query GetPokemon($id: Int!) {
    pokemon_v2_pokemon(where: {id: {_eq: $id}}) {"#,
    pokemon_fields!(),
    r#"    }
  }"#
);

pub const GET_POKEMONS_BY_IDS: &str = concat!(
    r#"query GetPokemonsByIds($ids: [Int!]!) {
    pokemon_v2_pokemon(where: {id: {_in: $ids}}, order_by: {id: asc}) {"#,
    pokemon_fields!(),
    r#"    }
  }"#
);
