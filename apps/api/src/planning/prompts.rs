// Prompt templates for project-plan generation.
// One template per methodology, held in a single table so every branding
// shares the exact same wording.

use crate::planning::methodology::Methodology;

/// Placeholder names recognised in the templates below.
pub const TITLE_PLACEHOLDER: &str = "titulo";
pub const OBJECTIVE_PLACEHOLDER: &str = "objetivo";
pub const MATERIALS_PLACEHOLDER: &str = "materiais";

/// A fixed prompt plus the section headers the model is asked to produce.
#[derive(Debug)]
pub struct PromptTemplate {
    pub methodology: Methodology,
    pub text: &'static str,
    pub sections: &'static [&'static str],
}

/// Scientific-method template. Replace: {titulo}, {objetivo}, {materiais}
pub const SCIENTIFIC_TEMPLATE: &str = r#"Crie um plano de trabalho para um projeto de pesquisa para uma feira de ciência que tem como título {titulo}. O objetivo do projeto é {objetivo}. Na execução do projeto será utilizado os seguintes materiais: {materiais}. A proposta que busco deve conter os seguintes elementos:

#1) Título
Escolha um título que reflita claramente o escopo do projeto.

#2) Propósito de trabalho
Explique o objetivo principal do projeto, ou seja, qual a pergunta ou problema que pretendo investigar. É importante destacar o significado e o impacto do projeto, bem como o que espero alcançar ao final da pesquisa.

#3) Hipótese
Apresente uma suposição inicial sobre os resultados da pesquisa. A hipótese é uma afirmativa que procura responder o problema de pesquisa com base em conhecimentos prévios e pesquisas sobre o assunto.

#4) Método
Descreva o método que pretende utilizar para conduzir a pesquisa. Isso inclui os procedimentos que serão seguidos e como os dados serão coletados.

#5) Materiais
Liste todos os materiais e equipamentos necessários para realizar o projeto. É importante ser específico e detalhado para que outros possam reproduzir o experimento, se necessário.

#6) Análise de dados
Explique como os dados coletados serão analisados. Isso pode envolver o uso de gráficos, estatísticas ou outras ferramentas relevantes para interpretar os resultados.

#7) Cronograma
Crie um cronograma detalhado em 4 meses, dividindo o projeto em etapas mensais, para garantir um desenvolvimento organizado e dentro do prazo estabelecido.

#8) Bibliografia
Inclua uma lista de pelo menos três (3) fontes utilizadas para embasar o projeto. Isso engloba livros, artigos científicos, sites e outras referências relevantes que inspiram para sua concepção."#;

/// Engineering-design template. Replace: {titulo}, {objetivo}, {materiais}
pub const ENGINEERING_TEMPLATE: &str = r#"Crie um plano de trabalho para um projeto de pesquisa para uma feira de ciência que tem como título {titulo}. O objetivo do projeto é {objetivo}. Na execução do projeto será utilizado os seguintes materiais: {materiais}. A proposta que busco deve conter os seguintes elementos:

#Propósito de Trabalho: Nesta seção, explicarei a razão de ser do projeto, isto é, qual problema ou desafio específico pretendo abordar. Além disso, ressaltarei os benefícios desta iniciativa e as suas possíveis contribuições.

#Características Físicas e Funcionais: Detalharei as características físicas e funcionais do projeto, explicando como ele será construído e como suas partes interagem para solucionar o problema proposto.

#Restrições/Limitações: Abordarei quaisquer restrições ou limitações que possam afetar o desenvolvimento ou a implementação do projeto. Isso pode incluir restrições orçamentárias, de tempo, de recursos, entre outras.

#Avaliação: Explicarei os critérios de avaliação que serão usados para medir o sucesso do projeto. Isso pode envolver testes, análises comparativas, pesquisas de satisfação, entre outros métodos de avaliação.

#Cronograma: Criarei um cronograma detalhado em 4 meses, dividindo o projeto em etapas mensais, para garantir um desenvolvimento organizado e dentro do prazo estabelecido.

#Bibliografia: Incluirei uma lista de pelo menos três (3) fontes utilizadas para embasar o projeto. Isso engloba livros, artigos científicos, sites e outras referências relevantes que inspiram para sua concepção."#;

pub static SCIENTIFIC: PromptTemplate = PromptTemplate {
    methodology: Methodology::Scientific,
    text: SCIENTIFIC_TEMPLATE,
    sections: &[
        "Título",
        "Propósito de trabalho",
        "Hipótese",
        "Método",
        "Materiais",
        "Análise de dados",
        "Cronograma",
        "Bibliografia",
    ],
};

pub static ENGINEERING: PromptTemplate = PromptTemplate {
    methodology: Methodology::Engineering,
    text: ENGINEERING_TEMPLATE,
    sections: &[
        "Propósito de Trabalho",
        "Características Físicas e Funcionais",
        "Restrições/Limitações",
        "Avaliação",
        "Cronograma",
        "Bibliografia",
    ],
};

/// Every methodology maps to exactly one template.
pub fn template_for(methodology: Methodology) -> &'static PromptTemplate {
    match methodology {
        Methodology::Scientific => &SCIENTIFIC,
        Methodology::Engineering => &ENGINEERING,
    }
}
